//! Incremental prefix search over the search-index artifacts emitted by
//! documentation generators.
//!
//! An artifact is loaded once into an immutable [`IndexStore`]; a [`QueryMatcher`]
//! answers partial user input against it and a [`Presenter`] groups the ranked
//! hits for display. A [`Catalog`] holds the per-category stores of a whole site.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod present;
pub mod search;
pub mod server;
pub mod tools;
pub mod tracing;

pub use cache::SnapshotCache;
pub use catalog::{Catalog, CatalogHit};
pub use config::SearchConfig;
pub use error::{ParseError, Position, Result};
pub use index::{Entry, EntryKind, IndexStore, StoreStats};
pub use present::{Grouping, Presenter, ResultGroup, ResultView, present, present_by_kind};
pub use search::{MatchMode, QueryMatcher, ScoredMatch};
