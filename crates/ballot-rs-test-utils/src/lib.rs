//! Test helpers shared across ballot crates.

pub mod names;
pub mod store;

pub use names::StubNames;
pub use store::{ScratchStore, scratch_store};
