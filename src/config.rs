//! Search configuration loaded from `doxsearch.toml`.

use crate::error::Result;
use crate::search::MatchMode;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up next to an index directory.
pub const CONFIG_FILE_NAME: &str = "doxsearch.toml";

/// Tunables for matching, presentation and caching.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Cap on matches returned by a query
    pub max_results: usize,
    pub match_mode: MatchMode,
    /// Hits shown in a rendered view
    pub display_budget: usize,
    /// Hits shown per scope or kind group
    pub group_budget: usize,
    /// Persist parsed artifacts as snapshots
    pub cache: bool,
    /// Snapshot directory; defaults to the user cache directory
    pub cache_dir: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 50,
            match_mode: MatchMode::Prefix,
            display_budget: 20,
            group_budget: 8,
            cache: true,
            cache_dir: None,
        }
    }
}

impl SearchConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid search configuration")
    }

    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In config file {}", path.display()))
    }

    /// Find configuration for an index path.
    ///
    /// Uses `explicit` when given, otherwise `doxsearch.toml` in the index directory
    /// (or the directory containing an index file), otherwise defaults.
    pub fn discover(explicit: Option<&Path>, index_path: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let dir = if index_path.is_dir() {
            Some(index_path)
        } else {
            index_path.parent()
        };

        match dir.map(|dir| dir.join(CONFIG_FILE_NAME)) {
            Some(candidate) if candidate.is_file() => {
                tracing::debug!("Using config file {}", candidate.display());
                Self::load(&candidate)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Snapshot directory, if caching is enabled and a directory can be determined.
    pub fn resolved_cache_dir(&self) -> Option<PathBuf> {
        if !self.cache {
            return None;
        }
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("doxsearch")))
    }
}
