//! Per-option comment storage for ballot options.

pub mod display;
pub mod error;
pub mod model;
pub mod store;

/// Presentation helpers and the identity seam.
pub use display::{CommentView, DisplayNames, RawAuthorNames, views};
/// Comment error type.
pub use error::CommentError;
/// Comment record model.
pub use model::{CommentKind, CommentRecord};
/// Store interface and default file implementation.
pub use store::{CommentStore, FileCommentStore};
