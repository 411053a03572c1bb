//! Query infrastructure for documentation search indexes.
//!
//! This module provides key and query normalization, prefix/substring matching
//! against an [`IndexStore`](crate::index::IndexStore), and relevance ordering.

pub mod normalize;
pub mod query;
pub mod scoring;

pub use query::{MatchMode, QueryMatcher};
pub use scoring::{ScoredMatch, calculate_relevance};
