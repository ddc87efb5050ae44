//! Replaying a diff package against a destination tree.
//!
//! Steps run in a fixed order: delete, rename, add-copy. Deletion only happens
//! when the caller opts in. A rename whose source is missing aborts the run,
//! since it means the destination no longer matches the package origin.
//!
//! Directories emptied by a deletion or a rename are removed, so a path can
//! change between file and directory. Renames go through a staging name first,
//! which frees a source that is an ancestor of another rename's target.

use crate::error::StorageError;
use crate::package::Package;
use crate::tree::copy::{copy_preserving_metadata, ensure_parent};
use crate::tree::path::{join_relative, SEPARATOR};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};

/// What a patch run changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub destination: PathBuf,
    /// Files removed from the destination
    pub deleted: usize,
    /// Deletion targets that were already absent
    pub delete_skipped: usize,
    /// Whether the deletion step ran at all
    pub deletions_enabled: bool,
    pub renamed: usize,
    pub copied: usize,
    pub bytes_copied: u64,
}

/// Apply the package at `package_dir` to `destination`.
#[instrument(skip(package_dir, destination), fields(package = %package_dir.display(), destination = %destination.display()))]
pub fn apply_package(
    package_dir: &Path,
    destination: &Path,
    perform_deletions: bool,
) -> Result<PatchReport, StorageError> {
    let start = Instant::now();
    let package = Package::open(package_dir)?;
    let added = package.added_paths()?;

    fs::create_dir_all(destination).map_err(|e| StorageError::io(destination, e))?;
    let mut report = PatchReport {
        destination: destination.to_path_buf(),
        deletions_enabled: perform_deletions,
        ..PatchReport::default()
    };

    if perform_deletions {
        for rel in package.deletions() {
            let target = join_relative(destination, rel);
            match fs::symlink_metadata(&target) {
                Ok(meta) if meta.is_dir() => {
                    return Err(StorageError::InvalidPath(format!(
                        "deletion target {:?} is a directory",
                        target
                    )));
                }
                Ok(_) => {
                    fs::remove_file(&target).map_err(|e| StorageError::io(&target, e))?;
                    prune_empty_parents(destination, rel)?;
                    trace!(path = %rel, "Deleted");
                    report.deleted += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %rel, "Deletion target already absent");
                    report.delete_skipped += 1;
                }
                Err(e) => return Err(StorageError::io(&target, e)),
            }
        }
    } else if !package.deletions().is_empty() {
        warn!(
            pending = package.deletions().len(),
            "Package lists deletions but deletion is disabled"
        );
    }

    let renames = package.renames();
    for (old, new) in renames {
        if fs::symlink_metadata(join_relative(destination, old)).is_err() {
            return Err(StorageError::MissingRenameSource {
                old: old.clone(),
                new: new.clone(),
            });
        }
    }

    let mut staged = Vec::with_capacity(renames.len());
    for (index, (old, _)) in renames.iter().enumerate() {
        let from = join_relative(destination, old);
        let stage = staging_path(destination, index);
        fs::rename(&from, &stage).map_err(|e| StorageError::io(&from, e))?;
        prune_empty_parents(destination, old)?;
        staged.push(stage);
    }
    for ((old, new), stage) in renames.iter().zip(staged) {
        let to = join_relative(destination, new);
        ensure_parent(&to)?;
        fs::rename(&stage, &to).map_err(|e| StorageError::io(&stage, e))?;
        trace!(from = %old, to = %new, "Renamed");
        report.renamed += 1;
    }

    let add_dir = package.add_dir();
    for rel in &added {
        let src = join_relative(&add_dir, rel);
        let dst = join_relative(destination, rel);
        report.bytes_copied += copy_preserving_metadata(&src, &dst)?;
        trace!(path = %rel, "Copied");
        report.copied += 1;
    }

    info!(
        deleted = report.deleted,
        renamed = report.renamed,
        copied = report.copied,
        duration_ms = start.elapsed().as_millis() as u64,
        "Patch applied"
    );
    Ok(report)
}

/// Remove the now-empty ancestors of `rel` under `destination`, deepest first.
fn prune_empty_parents(destination: &Path, rel: &str) -> Result<(), StorageError> {
    let mut rel = rel;
    while let Some((parent, _)) = rel.rsplit_once(SEPARATOR) {
        let dir = join_relative(destination, parent);
        let mut listing = fs::read_dir(&dir).map_err(|e| StorageError::io(&dir, e))?;
        if listing.next().is_some() {
            break;
        }
        fs::remove_dir(&dir).map_err(|e| StorageError::io(&dir, e))?;
        trace!(path = %parent, "Removed empty directory");
        rel = parent;
    }
    Ok(())
}

/// A name directly under `destination` that nothing occupies yet.
fn staging_path(destination: &Path, index: usize) -> PathBuf {
    let mut attempt = 0usize;
    loop {
        let candidate = destination.join(format!(".aofsync-rename-{}-{}", index, attempt));
        if fs::symlink_metadata(&candidate).is_err() {
            return candidate;
        }
        attempt += 1;
    }
}
