//! Sync operations: freeze, diff, patch, show.
//!
//! Each operation is a function of its directory arguments plus explicit
//! `SyncSettings`; nothing is kept between calls.

use crate::config::SyncSettings;
use crate::diff::{diff_snapshots, DiffResult};
use crate::error::SyncError;
use crate::package::{write_package, Package, PackageSummary};
use crate::patch::{apply_package, PatchReport};
use crate::snapshot::{take_snapshot, SnapshotStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Result of `freeze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreezeReport {
    pub source: PathBuf,
    pub state_file: PathBuf,
    pub files: usize,
}

/// Result of `diff`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub source: PathBuf,
    pub state_file: PathBuf,
    pub diff: DiffResult,
    /// None on a dry run
    pub package: Option<PackageSummary>,
}

/// Contents of a package, for `show`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageListing {
    pub package_dir: PathBuf,
    pub deleted: Vec<String>,
    pub renamed: Vec<(String, String)>,
    pub added: Vec<String>,
}

/// Snapshot `source` and write it to `state_file`.
#[instrument(skip(settings))]
pub fn freeze(
    source: &Path,
    state_file: &Path,
    settings: &SyncSettings,
) -> Result<FreezeReport, SyncError> {
    let excludes = settings.exclude_set()?;
    let snapshot = take_snapshot(source, &excludes, settings.max_hash_size)?;
    SnapshotStore::save(&snapshot, state_file)?;
    info!(files = snapshot.len(), "Frozen");
    Ok(FreezeReport {
        source: source.to_path_buf(),
        state_file: state_file.to_path_buf(),
        files: snapshot.len(),
    })
}

/// Compare `source` against the snapshot in `state_file` without writing anything.
pub fn compute_diff(
    source: &Path,
    state_file: &Path,
    settings: &SyncSettings,
) -> Result<DiffResult, SyncError> {
    let excludes = settings.exclude_set()?;
    let origin = SnapshotStore::load(state_file)?;
    let current = take_snapshot(source, &excludes, settings.max_hash_size)?;
    Ok(diff_snapshots(&origin, &current, &excludes))
}

/// Compare `source` against `state_file` and write the package to `package_dir`.
/// With `dry_run` the package is not written.
#[instrument(skip(settings))]
pub fn diff(
    source: &Path,
    state_file: &Path,
    package_dir: &Path,
    settings: &SyncSettings,
    dry_run: bool,
) -> Result<DiffReport, SyncError> {
    let diff = compute_diff(source, state_file, settings)?;
    let package = if dry_run {
        info!(changes = diff.change_count(), "Dry run, package not written");
        None
    } else {
        Some(write_package(&diff, source, package_dir)?)
    };
    Ok(DiffReport {
        source: source.to_path_buf(),
        state_file: state_file.to_path_buf(),
        diff,
        package,
    })
}

/// Apply the package in `package_dir` to `destination`.
/// Deletions only happen when `settings.delete` is set.
#[instrument(skip(settings))]
pub fn patch(
    package_dir: &Path,
    destination: &Path,
    settings: &SyncSettings,
) -> Result<PatchReport, SyncError> {
    Ok(apply_package(package_dir, destination, settings.delete)?)
}

/// List what a package would do.
pub fn show(package_dir: &Path) -> Result<PackageListing, SyncError> {
    let package = Package::open(package_dir)?;
    Ok(PackageListing {
        package_dir: package.dir().to_path_buf(),
        deleted: package.deletions().to_vec(),
        renamed: package.renames().to_vec(),
        added: package.added_paths()?,
    })
}
