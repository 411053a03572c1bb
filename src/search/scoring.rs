//! Search relevance and ranking.
//!
//! Hits are ordered by match tier first (prefix before substring), then by key length
//! so that shorter, more specific keys lead, then by display name. Sorting is stable,
//! so anything still tied keeps load order.

use crate::index::Entry;
use std::cmp::Ordering;

/// Relevance of an exact key match.
pub const EXACT: u32 = 100;
/// Relevance of a key that starts with the query.
pub const PREFIX: u32 = 50;
/// Relevance of a key that merely contains the query.
pub const SUBSTRING: u32 = 10;

/// Calculate simple text relevance score.
///
/// Returns a score based on how well the query matches the text:
/// - 100: Exact match
/// - 50: Text starts with query
/// - 10: Text contains query
/// - None: No match
pub fn calculate_relevance(text: &str, query: &str) -> Option<u32> {
    if text == query {
        Some(EXACT)
    } else if text.starts_with(query) {
        Some(PREFIX)
    } else if text.contains(query) {
        Some(SUBSTRING)
    } else {
        None
    }
}

/// An entry matched by a query, with its relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMatch<'a> {
    pub entry: &'a Entry,
    pub relevance: u32,
}

impl<'a> ScoredMatch<'a> {
    /// Scores `entry` against an already-normalized query.
    pub fn new(entry: &'a Entry, query: &str) -> Self {
        Self {
            entry,
            relevance: calculate_relevance(&entry.key, query).unwrap_or(0),
        }
    }

    /// Whether the key starts with the query (exact matches included).
    pub const fn is_prefix(&self) -> bool {
        self.relevance >= PREFIX
    }
}

/// Orders two hits for display.
pub fn compare_hits(a: &ScoredMatch<'_>, b: &ScoredMatch<'_>) -> Ordering {
    b.is_prefix()
        .cmp(&a.is_prefix())
        .then_with(|| compare_entries(a.entry, b.entry))
}

/// Orders two entries of the same tier: shorter key first, then display name.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    a.key_len()
        .cmp(&b.key_len())
        .then_with(|| a.display_name.cmp(&b.display_name))
}
