//! Immutable in-memory index over the entries of one artifact.

use super::artifact::parse_artifact;
use super::entry::{Entry, EntryKind};
use crate::error::ParseError;
use crate::search::normalize::{decode_key, normalize_query};
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;

/// Read-only symbol index built once from an artifact.
///
/// `IndexStore` holds no interior mutability and can be shared across threads
/// (`Arc<IndexStore>`) without locking.
#[derive(Debug, Clone, Default)]
pub struct IndexStore {
    /// Entries in load order; `entries[i].ordinal == i`
    entries: Vec<Entry>,
    /// Entry positions sorted by key, then load order, for prefix range scans
    by_key: Vec<usize>,
}

/// Summary counts for a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub entries: usize,
    pub distinct_keys: usize,
    pub distinct_targets: usize,
    pub external_links: usize,
    pub kinds: BTreeMap<EntryKind, usize>,
}

impl IndexStore {
    /// Parses an artifact into a store.
    ///
    /// Fails without exposing any partial index when the artifact is malformed.
    pub fn load(raw: &str) -> Result<Self, ParseError> {
        let start = std::time::Instant::now();
        let records = parse_artifact(raw)?;

        for (index, record) in records.iter().enumerate() {
            if decode_key(&record.key).key.is_empty() {
                return Err(ParseError::record(index + 1, "key is empty"));
            }
        }

        let entries = records.iter().flat_map(Entry::from_record).collect();
        let store = Self::from_entries(entries);

        tracing::debug!(
            "Loaded search index: {} records, {} entries in {:?}",
            records.len(),
            store.len(),
            start.elapsed()
        );

        Ok(store)
    }

    /// Builds a store from already-decoded entries.
    ///
    /// Ordinals are reassigned in the given order and later duplicates of a
    /// `(key, target_ref)` pair are dropped.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut seen: AHashSet<(String, String)> = AHashSet::with_capacity(entries.len());
        let mut kept = Vec::with_capacity(entries.len());

        for mut entry in entries {
            if !seen.insert((entry.key.clone(), entry.target_ref.clone())) {
                tracing::trace!(
                    "Skipping duplicate entry '{}' -> {}",
                    entry.key,
                    entry.target_ref
                );
                continue;
            }
            entry.ordinal = kept.len();
            kept.push(entry);
        }

        let mut by_key: Vec<usize> = (0..kept.len()).collect();
        by_key.sort_by(|&a, &b| kept[a].key.cmp(&kept[b].key).then(a.cmp(&b)));

        Self {
            entries: kept,
            by_key,
        }
    }

    /// All entries whose key starts with the normalized `term`.
    ///
    /// Results are in load order, stably re-sorted by key length ascending. An empty
    /// term matches nothing.
    pub fn lookup_prefix(&self, term: &str) -> Vec<&Entry> {
        let term = normalize_query(term);
        if term.is_empty() {
            return vec![];
        }

        let start = self
            .by_key
            .partition_point(|&i| self.entries[i].key.as_str() < term.as_str());

        let mut hits: Vec<usize> = self.by_key[start..]
            .iter()
            .copied()
            .take_while(|&i| self.entries[i].key.starts_with(&term))
            .collect();

        self.order(&mut hits)
    }

    /// Entries whose key contains the normalized `term` somewhere after its first
    /// character. Prefix hits are excluded; the ordering matches [`Self::lookup_prefix`].
    pub fn lookup_substring(&self, term: &str) -> Vec<&Entry> {
        let term = normalize_query(term);
        if term.is_empty() {
            return vec![];
        }

        let mut hits: Vec<usize> = self
            .entries
            .iter()
            .filter(|entry| !entry.key.starts_with(&term) && entry.key.contains(&term))
            .map(|entry| entry.ordinal)
            .collect();

        self.order(&mut hits)
    }

    /// Sorts entry positions by (key length, load order) and resolves them.
    fn order(&self, hits: &mut [usize]) -> Vec<&Entry> {
        hits.sort_unstable_by_key(|&i| (self.entries[i].key_len(), i));
        hits.iter().map(|&i| &self.entries[i]).collect()
    }

    /// All entries in load order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        let mut keys = AHashSet::new();
        let mut targets = AHashSet::new();
        let mut kinds: AHashMap<EntryKind, usize> = AHashMap::new();
        let mut external_links = 0;

        for entry in &self.entries {
            keys.insert(entry.key.as_str());
            targets.insert(entry.target_ref.as_str());
            *kinds.entry(entry.kind).or_insert(0) += 1;
            if !entry.local {
                external_links += 1;
            }
        }

        StoreStats {
            entries: self.entries.len(),
            distinct_keys: keys.len(),
            distinct_targets: targets.len(),
            external_links,
            kinds: kinds.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    const ARTIFACT: &str = r"var searchData=
[
  ['object_6334',['Object',['../classchip_1_1_system_1_1_object.html',1,'chip::System']]],
  ['objectarena_6335',['ObjectArena',['../unionchip_1_1_system_1_1_object_arena.html',1,'chip::System']]],
  ['objectarena_3c_20void_20_2a_2c_20n_20_2asizeof_28t_29_3e_6341',['ObjectArena&lt; void *, N *sizeof(T)&gt;',['../unionchip_1_1_system_1_1_object_arena.html',1,'chip::System']]],
  ['objectpool_6342',['ObjectPool',['../classchip_1_1_system_1_1_object_pool.html',1,'chip::System']]],
  ['onoffcluster_6348',['OnOffCluster',['../classchip_1_1_controller_1_1_on_off_cluster.html',1,'chip::Controller']]]
];
";

    fn names(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.display_name.clone()).collect()
    }

    #[test]
    fn test_load_preserves_order_and_ordinals() {
        let store = IndexStore::load(ARTIFACT).unwrap();
        check!(store.len() == 5);
        for (i, entry) in store.entries().iter().enumerate() {
            check!(entry.ordinal == i);
        }
    }

    #[test]
    fn test_empty_prefix_matches_nothing() {
        let store = IndexStore::load(ARTIFACT).unwrap();
        check!(store.lookup_prefix("").is_empty());
        check!(store.lookup_prefix("   ").is_empty());
    }

    #[test]
    fn test_prefix_sorted_by_key_length() {
        let store = IndexStore::load(ARTIFACT).unwrap();
        let hits = store.lookup_prefix("Object");
        check!(
            names(&hits)
                == [
                    "Object",
                    "ObjectPool",
                    "ObjectArena",
                    "ObjectArena< void *, N *sizeof(T)>"
                ]
        );
    }

    #[test]
    fn test_prefix_is_case_insensitive_and_trimmed() {
        let store = IndexStore::load(ARTIFACT).unwrap();
        check!(names(&store.lookup_prefix("  OBJECTP ")) == ["ObjectPool"]);
    }

    #[test]
    fn test_prefix_matches_decoded_template_text() {
        let store = IndexStore::load(ARTIFACT).unwrap();
        let hits = store.lookup_prefix("objectarena<");
        check!(hits.len() == 1);
        check!(hits[0].serial == Some(6341));
    }

    #[test]
    fn test_equal_length_keys_keep_load_order() {
        let raw = "[['beta_1',['Beta',['b.html',1,'']]],['alfa_2',['Alfa',['a.html',1,'']]],['abcd_3',['Abcd',['c.html',1,'']]]]";
        let store = IndexStore::load(raw).unwrap();
        // "beta" does not start with "a"; both four-letter "a" keys keep load order
        check!(names(&store.lookup_prefix("a")) == ["Alfa", "Abcd"]);
    }

    #[test]
    fn test_substring_excludes_prefix_hits() {
        let store = IndexStore::load(ARTIFACT).unwrap();
        check!(names(&store.lookup_substring("pool")) == ["ObjectPool"]);
        check!(store.lookup_substring("object").is_empty());
        check!(store.lookup_substring("").is_empty());
    }

    #[test]
    fn test_duplicate_key_and_target_dropped() {
        let raw = "[['a_1',['A',['a.html',1,'x']]],['a_2',['A',['a.html',1,'y']]],['a_3',['A',['b.html',1,'x']]]]";
        let store = IndexStore::load(raw).unwrap();
        check!(store.len() == 2);
        check!(store.entries()[1].target_ref == "b.html");
        check!(store.entries()[1].ordinal == 1);
    }

    #[test]
    fn test_malformed_artifact_is_rejected() {
        let_assert!(Err(ParseError::UnexpectedEof { .. }) = IndexStore::load("[['a_1',['A',['a.html',1,'']]"));
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let result = IndexStore::load("[['_12',['A',['a.html',1,'']]]]");
        let_assert!(Err(ParseError::InvalidRecord { record, reason }) = result);
        check!(record == 1);
        check!(reason == "key is empty");

        let result = IndexStore::load("[['_20_2',['A',['a.html',1,'']]]]");
        let_assert!(Err(ParseError::InvalidRecord { reason, .. }) = result);
        check!(reason == "key is empty");
    }

    #[test]
    fn test_padded_key_is_trimmed() {
        let store = IndexStore::load("[['_20foo_1',['foo',['foo.html',1,'']]]]").unwrap();
        check!(store.entries()[0].key == "foo");
        check!(store.lookup_prefix("foo").len() == 1);
    }

    #[test]
    fn test_stats() {
        let store = IndexStore::load(ARTIFACT).unwrap();
        let stats = store.stats();
        check!(stats.entries == 5);
        check!(stats.distinct_keys == 5);
        check!(stats.distinct_targets == 4);
        check!(stats.external_links == 0);
        check!(stats.kinds.get(&EntryKind::Class) == Some(&3));
        check!(stats.kinds.get(&EntryKind::Union) == Some(&2));
    }
}
