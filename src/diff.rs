//! Change classification between a stored snapshot and the current tree.
//!
//! Renames are inferred from content: a path that disappeared whose
//! fingerprint now lives at another path is a rename. A content change at a
//! stable path is reported as `added` (full replacement); there is no
//! separate "modified" category.

use crate::exclude::ExcludeSet;
use crate::snapshot::Snapshot;
use crate::tree::hasher::Fingerprint;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument, trace};

/// Classified changes from an origin snapshot to a current one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// New files and files whose content changed
    pub added: BTreeSet<String>,
    /// Files gone without a content match elsewhere
    pub deleted: BTreeSet<String>,
    /// `(old_path, new_path)` pairs with equal content
    pub renamed: BTreeSet<(String, String)>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.renamed.is_empty()
    }

    /// Number of entries across all categories
    pub fn change_count(&self) -> usize {
        self.added.len() + self.deleted.len() + self.renamed.len()
    }
}

/// Fingerprint to path index over the current snapshot.
///
/// When several paths share a fingerprint the lexicographically smallest one
/// is kept, so the result does not depend on iteration order.
fn reverse_index(current: &Snapshot) -> HashMap<Fingerprint, &str> {
    let mut index: HashMap<Fingerprint, &str> = HashMap::with_capacity(current.len());
    for (path, fp) in current {
        index
            .entry(*fp)
            .and_modify(|kept| {
                if path.as_str() < *kept {
                    *kept = path.as_str();
                }
            })
            .or_insert(path.as_str());
    }
    index
}

/// Compare `origin` (stored) with `current` (freshly computed).
///
/// Both snapshots are filtered through `excludes` first, so an excluded path
/// never shows up in any category even if only one side contains it.
#[instrument(skip_all, fields(origin = origin.len(), current = current.len()))]
pub fn diff_snapshots(origin: &Snapshot, current: &Snapshot, excludes: &ExcludeSet) -> DiffResult {
    let origin = origin.without_excluded(excludes);
    let current = current.without_excluded(excludes);
    let index = reverse_index(&current);

    let mut result = DiffResult::default();
    let mut rename_targets: BTreeSet<&str> = BTreeSet::new();

    for (path, fp) in &origin {
        match current.get(path) {
            None => match index.get(fp) {
                Some(&new_path) if new_path != path.as_str() => {
                    trace!(from = %path, to = %new_path, "Renamed");
                    rename_targets.insert(new_path);
                    result.renamed.insert((path.clone(), new_path.to_string()));
                }
                _ => {
                    trace!(path = %path, "Deleted");
                    result.deleted.insert(path.clone());
                }
            },
            Some(now) if now != fp => {
                trace!(path = %path, "Changed");
                result.added.insert(path.clone());
            }
            Some(_) => {}
        }
    }

    for (path, _) in &current {
        if !origin.contains(path) && !rename_targets.contains(path.as_str()) {
            trace!(path = %path, "Added");
            result.added.insert(path.clone());
        }
    }

    debug!(
        added = result.added.len(),
        deleted = result.deleted.len(),
        renamed = result.renamed.len(),
        "Diff classified"
    );
    if result.is_empty() {
        info!("No changes since snapshot");
    }
    result
}
