//! Snapshot caching of parsed search indexes.
//!
//! A snapshot is the decoded entry list of one artifact, serialized with postcard and
//! keyed by the xxh3 digest of the artifact bytes. Identical bytes always map to the
//! same snapshot, so no invalidation is needed beyond the format version.

use crate::error::ParseError;
use crate::index::{Entry, IndexStore};
use postcard::{from_bytes, to_io};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// Bumped whenever [`Entry`] or the snapshot layout changes.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    digest: u64,
    entries: Vec<Entry>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    digest: u64,
    entries: &'a [Entry],
}

/// Digest of an artifact, used as its snapshot key.
pub fn artifact_digest(raw: &[u8]) -> u64 {
    xxh3_64(raw)
}

/// Directory of postcard snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot_path(&self, digest: u64) -> PathBuf {
        self.dir.join(format!("{:016x}.idx", digest))
    }

    /// Returns the store for `raw`, from a snapshot when one exists.
    ///
    /// Parse errors are returned as-is; cache I/O problems are logged and otherwise
    /// ignored.
    pub fn load_or_parse(&self, raw: &str) -> Result<IndexStore, ParseError> {
        let digest = artifact_digest(raw.as_bytes());
        let path = self.snapshot_path(digest);

        if let Some(store) = Self::load(&path, digest) {
            tracing::debug!(
                "Loaded cached search index {} ({} entries)",
                path.display(),
                store.len()
            );
            return Ok(store);
        }

        let store = IndexStore::load(raw)?;
        self.store(&path, &store, digest);
        Ok(store)
    }

    /// Load a snapshot from disk, discarding it if stale or corrupt.
    fn load(path: &Path, digest: u64) -> Option<IndexStore> {
        let bytes = std::fs::read(path).ok()?;

        match from_bytes::<Snapshot>(&bytes) {
            Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION && snapshot.digest == digest => {
                Some(IndexStore::from_entries(snapshot.entries))
            }
            Ok(snapshot) => {
                tracing::info!(
                    "Snapshot {} is stale (version {}), will rebuild",
                    path.display(),
                    snapshot.version
                );
                let _ = std::fs::remove_file(path);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to deserialize snapshot at {}: {}", path.display(), e);
                let _ = std::fs::remove_file(path);
                None
            }
        }
    }

    /// Store a snapshot to disk.
    fn store(&self, path: &Path, store: &IndexStore, digest: u64) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!(
                "Failed to create snapshot directory {}: {}",
                self.dir.display(),
                e
            );
            return;
        }

        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            digest,
            entries: store.entries(),
        };

        match std::fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(path)
        {
            Ok(mut file) => {
                if let Err(e) = to_io(&snapshot, &mut file) {
                    tracing::warn!("Failed to write snapshot to {}: {}", path.display(), e);
                    let _ = std::fs::remove_file(path);
                } else {
                    tracing::debug!("Cached search index to {}", path.display());
                }
            }
            Err(e) if e.kind() != std::io::ErrorKind::AlreadyExists => {
                tracing::warn!("Failed to create snapshot file {}: {}", path.display(), e);
            }
            _ => {
                // Already exists, another process may have created it
                tracing::debug!("Snapshot already exists at {}", path.display());
            }
        }
    }
}
