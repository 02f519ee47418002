//! Presentation-facing view of stored comments.

use crate::model::{CommentKind, CommentRecord};

/// Resolves a user identifier to a human name.
///
/// Implemented by the identity service; names are never persisted.
pub trait DisplayNames {
    /// Display name for the given author id.
    fn display_name(&self, author: &str) -> String;
}

/// Identity lookup that echoes the author id back.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawAuthorNames;

impl DisplayNames for RawAuthorNames {
    fn display_name(&self, author: &str) -> String {
        author.to_string()
    }
}

/// A comment paired with its resolved author name and formatted date.
///
/// `body` is still unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub author_name: String,
    pub date: String,
    pub kind: CommentKind,
    pub body: String,
}

impl CommentView {
    /// Build a view using the local zone for the date.
    pub fn from_record(record: &CommentRecord, names: &impl DisplayNames) -> Self {
        Self::with_date(record, names, record.nice_date())
    }

    fn with_date(record: &CommentRecord, names: &impl DisplayNames, date: String) -> Self {
        Self {
            author_name: names.display_name(&record.author),
            date,
            kind: record.kind,
            body: record.body.clone(),
        }
    }
}

/// Build views for a whole collection, keeping its order.
pub fn views(records: &[CommentRecord], names: &impl DisplayNames) -> Vec<CommentView> {
    records
        .iter()
        .map(|record| CommentView::from_record(record, names))
        .collect()
}
