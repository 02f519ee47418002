//! Error types for comment storage.

use std::path::PathBuf;

/// Errors returned by comment stores.
#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    /// Required input was missing or unusable; raised before any IO.
    #[error("comments: {0}")]
    Validation(String),
    /// The option file or storage root could not be opened or written.
    #[error("comments: could not open file: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Persisted contents did not decode to well-formed records.
    #[error("comments: corrupt data in {} at line {line}: {reason}", path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// Serialization error.
    #[error("comments: serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl CommentError {
    /// Build an IO error tagged with the path that failed.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the caller can recover by re-supplying input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
