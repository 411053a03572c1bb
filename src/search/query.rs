//! Query matching against a loaded [`IndexStore`].

use super::normalize::normalize_query;
use super::scoring::{ScoredMatch, compare_hits};
use crate::index::{Entry, IndexStore};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// Which keys a query matches: `prefix` keys start with the query; `substring` adds
/// keys containing it elsewhere, ranked after every prefix hit.
///
/// DO NOT add doc comments to individual variants - this causes schemars to generate
/// `oneOf` schemas instead of simple `enum` arrays, breaking MCP client enum handling.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Prefix,
    Substring,
}

/// Finds and ranks store entries for partial user input.
///
/// Matching is pure: the same query against the same store always yields the same
/// ordered result.
#[derive(Debug, Clone, Copy)]
pub struct QueryMatcher<'a> {
    store: &'a IndexStore,
    mode: MatchMode,
}

impl<'a> QueryMatcher<'a> {
    pub const fn new(store: &'a IndexStore) -> Self {
        Self {
            store,
            mode: MatchMode::Prefix,
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns at most `max_results` entries for `query`.
    ///
    /// The query is trimmed and lowercased; an empty query matches nothing. Hits are
    /// ordered by key length ascending, ties broken by display name.
    pub fn matches(&self, query: &str, max_results: usize) -> Vec<&'a Entry> {
        self.scored_matches(query, max_results)
            .into_iter()
            .map(|hit| hit.entry)
            .collect()
    }

    /// Like [`Self::matches`], keeping each hit's relevance.
    pub fn scored_matches(&self, query: &str, max_results: usize) -> Vec<ScoredMatch<'a>> {
        let query = normalize_query(query);
        if query.is_empty() || max_results == 0 {
            return vec![];
        }

        let mut hits: Vec<ScoredMatch<'a>> = self
            .store
            .lookup_prefix(&query)
            .into_iter()
            .map(|entry| ScoredMatch::new(entry, &query))
            .collect();

        if self.mode == MatchMode::Substring {
            hits.extend(
                self.store
                    .lookup_substring(&query)
                    .into_iter()
                    .map(|entry| ScoredMatch::new(entry, &query)),
            );
        }

        hits.sort_by(compare_hits);
        hits.truncate(max_results);

        tracing::trace!("Query '{}' matched {} entries", query, hits.len());
        hits
    }
}
