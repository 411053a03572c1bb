//! Per-category collection of index stores for one documentation site.
//!
//! Generators split their search data by category and leading character:
//! `search/classes_e.js`, `search/functions_3.js`, `search/all_0.js`. A catalog
//! merges the buckets of each category into one store.

use crate::cache::SnapshotCache;
use crate::error::Result;
use crate::index::{Entry, IndexStore};
use crate::search::scoring::{ScoredMatch, compare_hits};
use crate::search::{MatchMode, QueryMatcher};
use anyhow::{Context, bail};
use ignore::WalkBuilder;
use rapidfuzz::distance::jaro_winkler;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Category generators use for the combined "All" tab.
pub const ALL_CATEGORY: &str = "all";

/// Category used for an artifact whose file name carries none.
pub const DEFAULT_CATEGORY: &str = "symbols";

static ARTIFACT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<category>[a-z]+)_(?P<bucket>[0-9a-z]+)\.(?:js|json)$")
        .expect("Invalid artifact name pattern")
});

/// Splits an artifact file name such as `classes_e.js` into category and bucket.
pub fn parse_artifact_name(file_name: &str) -> Option<(&str, &str)> {
    let captures = ARTIFACT_NAME.captures(file_name)?;
    let category = captures.name("category")?.as_str();
    let bucket = captures.name("bucket")?.as_str();
    Some((category, bucket))
}

/// Sort key for a bucket name. Numeric buckets order by value and come before
/// character buckets, so `all_2` loads before `all_10`.
fn bucket_order(bucket: &str) -> (u8, u64, &str) {
    match bucket.parse::<u64>() {
        Ok(number) => (0, number, bucket),
        Err(_) => (1, 0, bucket),
    }
}

/// A hit from a catalog search, tagged with the category it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogHit<'a> {
    pub category: &'a str,
    pub hit: ScoredMatch<'a>,
}

impl<'a> CatalogHit<'a> {
    pub const fn entry(&self) -> &'a Entry {
        self.hit.entry
    }
}

/// Index stores keyed by category name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stores: BTreeMap<String, IndexStore>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a store. A category inserted twice keeps the entries of both, in
    /// insertion order.
    pub fn insert(&mut self, category: impl Into<String>, store: IndexStore) {
        let category = category.into();
        match self.stores.remove(&category) {
            Some(existing) => {
                let entries = existing
                    .entries()
                    .iter()
                    .chain(store.entries())
                    .cloned()
                    .collect();
                self.stores.insert(category, IndexStore::from_entries(entries));
            }
            None => {
                self.stores.insert(category, store);
            }
        }
    }

    /// Loads a single artifact file or every artifact in a directory.
    pub fn load_path(path: &Path, cache: Option<&SnapshotCache>) -> Result<Self> {
        if path.is_dir() {
            return Self::load_dir(path, cache);
        }

        let category = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_artifact_name)
            .map_or(DEFAULT_CATEGORY, |(category, _)| category)
            .to_string();

        let mut catalog = Self::new();
        catalog.insert(category, load_artifact(path, cache)?);
        Ok(catalog)
    }

    /// Loads every `<category>_<bucket>.js` artifact directly inside `dir`.
    ///
    /// Buckets of a category are merged in bucket order, numeric buckets by value.
    /// The first malformed artifact aborts the load.
    pub fn load_dir(dir: &Path, cache: Option<&SnapshotCache>) -> Result<Self> {
        let start = std::time::Instant::now();
        let mut artifacts: Vec<(String, String, PathBuf)> = Vec::new();

        for result in WalkBuilder::new(dir)
            .max_depth(Some(1))
            .standard_filters(false)
            .build()
        {
            let entry = result.with_context(|| format!("Failed to list {}", dir.display()))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Some((category, bucket)) = entry.file_name().to_str().and_then(parse_artifact_name)
            else {
                continue;
            };
            artifacts.push((category.to_string(), bucket.to_string(), entry.into_path()));
        }

        if artifacts.is_empty() {
            bail!("No search index artifacts found in {}", dir.display());
        }

        artifacts.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| bucket_order(&a.1).cmp(&bucket_order(&b.1)))
        });

        let mut grouped: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
        for (category, _, path) in &artifacts {
            let store = load_artifact(path, cache)?;
            grouped
                .entry(category.clone())
                .or_default()
                .extend(store.entries().iter().cloned());
        }

        let stores: BTreeMap<String, IndexStore> = grouped
            .into_iter()
            .map(|(category, entries)| (category, IndexStore::from_entries(entries)))
            .collect();

        let catalog = Self { stores };
        tracing::info!(
            "Loaded {} artifacts from {}: {} categories, {} entries in {:?}",
            artifacts.len(),
            dir.display(),
            catalog.stores.len(),
            catalog.len(),
            start.elapsed()
        );

        Ok(catalog)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    pub fn store(&self, category: &str) -> Option<&IndexStore> {
        self.stores.get(category)
    }

    /// Total entries across categories.
    pub fn len(&self) -> usize {
        self.stores.values().map(IndexStore::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.values().all(IndexStore::is_empty)
    }

    /// Searches one category, or the whole catalog when `category` is `None`.
    ///
    /// A whole-catalog search uses the combined `all` category when the site ships
    /// one, since it already contains every other category. Otherwise hits from all
    /// categories are merged with the same ordering a single store uses.
    /// Returns `None` when the named category does not exist.
    pub fn search(
        &self,
        query: &str,
        category: Option<&str>,
        mode: MatchMode,
        max_results: usize,
    ) -> Option<Vec<CatalogHit<'_>>> {
        let selected: Vec<(&str, &IndexStore)> = match category {
            Some(name) => {
                let (name, store) = self.stores.get_key_value(name)?;
                vec![(name.as_str(), store)]
            }
            None => match self.stores.get_key_value(ALL_CATEGORY) {
                Some((name, store)) => vec![(name.as_str(), store)],
                None => self
                    .stores
                    .iter()
                    .map(|(name, store)| (name.as_str(), store))
                    .collect(),
            },
        };

        let mut hits: Vec<CatalogHit<'_>> = selected
            .into_iter()
            .flat_map(|(category, store)| {
                QueryMatcher::new(store)
                    .with_mode(mode)
                    .scored_matches(query, max_results)
                    .into_iter()
                    .map(move |hit| CatalogHit { category, hit })
            })
            .collect();

        hits.sort_by(|a, b| compare_hits(&a.hit, &b.hit));
        hits.truncate(max_results);
        Some(hits)
    }

    /// Category names similar to `name`, best first.
    pub fn suggest_categories(&self, name: &str) -> Vec<&str> {
        let mut scored: Vec<(f64, &str)> = self
            .categories()
            .map(|category| {
                (
                    jaro_winkler::similarity(name.chars(), category.chars()),
                    category,
                )
            })
            .filter(|(score, _)| *score > 0.7)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().map(|(_, category)| category).collect()
    }
}

fn load_artifact(path: &Path, cache: Option<&SnapshotCache>) -> Result<IndexStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read search index {}", path.display()))?;

    let store = match cache {
        Some(cache) => cache.load_or_parse(&raw),
        None => IndexStore::load(&raw),
    };

    store.with_context(|| format!("Malformed search index {}", path.display()))
}
