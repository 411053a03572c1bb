//! Loading search-index artifacts into an immutable in-memory store.

pub mod artifact;
pub mod entry;
pub mod store;

pub use artifact::{RawRecord, RawTarget, parse_artifact};
pub use entry::{Entry, EntryKind};
pub use store::{IndexStore, StoreStats};
