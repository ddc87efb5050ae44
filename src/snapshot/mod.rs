//! Snapshots: relative path to content fingerprint, taken at one point in time
//!
//! A snapshot is always recomputed from the filesystem; it is never updated in
//! place. Entries are kept sorted by path so the serialized form is stable.

pub mod store;

use crate::error::StorageError;
use crate::exclude::ExcludeSet;
use crate::tree::hasher::{fingerprint_file, Fingerprint};
use crate::tree::walker::{Walker, WalkerConfig};
use std::collections::btree_map::{self, BTreeMap};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

pub use store::SnapshotStore;

/// One snapshot entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub relative_path: String,
    pub fingerprint: Fingerprint,
}

/// Mapping of relative path to fingerprint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeMap<String, Fingerprint>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. Returns the previous fingerprint if the path was already present.
    pub fn insert(&mut self, relative_path: String, fingerprint: Fingerprint) -> Option<Fingerprint> {
        self.files.insert(relative_path, fingerprint)
    }

    pub fn get(&self, relative_path: &str) -> Option<&Fingerprint> {
        self.files.get(relative_path)
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.files.contains_key(relative_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Entries in path order
    pub fn iter(&self) -> btree_map::Iter<'_, String, Fingerprint> {
        self.files.iter()
    }

    /// Entries in path order
    pub fn records(&self) -> impl Iterator<Item = FileRecord> + '_ {
        self.files.iter().map(|(path, fp)| FileRecord {
            relative_path: path.clone(),
            fingerprint: *fp,
        })
    }

    /// Copy of this snapshot without the excluded paths
    pub fn without_excluded(&self, excludes: &ExcludeSet) -> Snapshot {
        if excludes.is_empty() {
            return self.clone();
        }
        Snapshot {
            files: self
                .files
                .iter()
                .filter(|(path, _)| !excludes.is_excluded(path))
                .map(|(path, fp)| (path.clone(), *fp))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a Fingerprint);
    type IntoIter = btree_map::Iter<'a, String, Fingerprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Walk `root` and fingerprint every non-excluded regular file.
///
/// `max_bytes` is the fingerprint budget per file (0 = whole file); it must
/// match the budget of any snapshot this one is compared against.
#[instrument(skip(root, excludes), fields(root = %root.display()))]
pub fn take_snapshot(
    root: &Path,
    excludes: &ExcludeSet,
    max_bytes: u64,
) -> Result<Snapshot, StorageError> {
    let start = Instant::now();
    let config = WalkerConfig {
        excludes: excludes.clone(),
        ..WalkerConfig::default()
    };
    let entries = Walker::with_config(root.to_path_buf(), config).walk()?;
    debug!(entry_count = entries.len(), "Walked filesystem");

    let mut snapshot = Snapshot::new();
    for entry in entries {
        let fingerprint = fingerprint_file(&entry.path, max_bytes)?;
        trace!(path = %entry.relative, %fingerprint, "Fingerprinted");
        snapshot.insert(entry.relative, fingerprint);
    }

    info!(
        files = snapshot.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Snapshot complete"
    );
    Ok(snapshot)
}
