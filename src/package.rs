//! Diff packages: the portable on-disk form of a `DiffResult`.
//!
//! Layout of a package directory:
//!
//! ```text
//! <package>/.delete        one relative path per line
//! <package>/.rename        one "old -> new" line per rename
//! <package>/.add/<path>    full copies of added and changed files
//! ```

use crate::diff::DiffResult;
use crate::error::StorageError;
use crate::manifest;
use crate::tree::copy::copy_preserving_metadata;
use crate::tree::path::{join_relative, validate_relative};
use crate::tree::walker::Walker;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Deletion manifest file name
pub const DELETE_MANIFEST: &str = ".delete";
/// Rename manifest file name
pub const RENAME_MANIFEST: &str = ".rename";
/// Directory holding copies of added files
pub const ADD_DIR: &str = ".add";

/// What a packaging run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub package_dir: PathBuf,
    pub added: usize,
    pub deleted: usize,
    pub renamed: usize,
    pub bytes_copied: u64,
}

/// Write `diff` as a package under `package_dir`, copying added files from `source_root`.
///
/// Re-running over an existing package replaces its manifests and its `.add` tree.
#[instrument(skip(diff), fields(changes = diff.change_count()))]
pub fn write_package(
    diff: &DiffResult,
    source_root: &Path,
    package_dir: &Path,
) -> Result<PackageSummary, StorageError> {
    let start = Instant::now();
    fs::create_dir_all(package_dir).map_err(|e| StorageError::io(package_dir, e))?;

    let delete_lines: Vec<String> = diff
        .deleted
        .iter()
        .map(|p| manifest::encode_delete_line(p))
        .collect();
    let rename_lines = diff
        .renamed
        .iter()
        .map(|(old, new)| manifest::encode_rename_line(old, new))
        .collect::<Result<Vec<_>, _>>()?;

    manifest::write_lines(&package_dir.join(DELETE_MANIFEST), &delete_lines)?;
    manifest::write_lines(&package_dir.join(RENAME_MANIFEST), &rename_lines)?;
    debug!(
        deleted = delete_lines.len(),
        renamed = rename_lines.len(),
        "Manifests written"
    );

    let add_dir = package_dir.join(ADD_DIR);
    if add_dir.exists() {
        fs::remove_dir_all(&add_dir).map_err(|e| StorageError::io(&add_dir, e))?;
    }
    fs::create_dir_all(&add_dir).map_err(|e| StorageError::io(&add_dir, e))?;

    let mut bytes_copied = 0u64;
    for rel in &diff.added {
        let src = join_relative(source_root, rel);
        let dst = join_relative(&add_dir, rel);
        bytes_copied += copy_preserving_metadata(&src, &dst)?;
        trace!(path = %rel, "Packaged");
    }

    let summary = PackageSummary {
        package_dir: package_dir.to_path_buf(),
        added: diff.added.len(),
        deleted: diff.deleted.len(),
        renamed: diff.renamed.len(),
        bytes_copied,
    };
    info!(
        added = summary.added,
        deleted = summary.deleted,
        renamed = summary.renamed,
        bytes = summary.bytes_copied,
        duration_ms = start.elapsed().as_millis() as u64,
        "Package written"
    );
    Ok(summary)
}

/// A package opened for reading
#[derive(Debug, Clone)]
pub struct Package {
    dir: PathBuf,
    deletions: Vec<String>,
    renames: Vec<(String, String)>,
}

impl Package {
    /// Open a package directory and parse both manifests.
    ///
    /// Fails if the directory lacks `.delete` or `.rename`, or if any manifest
    /// line is malformed or points outside the tree.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        if !dir.is_dir() {
            return Err(StorageError::InvalidPackage(format!(
                "{:?} is not a directory",
                dir
            )));
        }
        for name in [DELETE_MANIFEST, RENAME_MANIFEST] {
            if !dir.join(name).is_file() {
                return Err(StorageError::InvalidPackage(format!(
                    "{:?} has no {} manifest",
                    dir, name
                )));
            }
        }

        let delete_path = dir.join(DELETE_MANIFEST);
        let mut deletions = Vec::new();
        for (line_no, line) in manifest::read_lines(&delete_path)? {
            let rel = manifest::decode_delete_line(&line)
                .map_err(|reason| parse_error(&delete_path, line_no, reason))?;
            validate_relative(&rel).map_err(|e| parse_error(&delete_path, line_no, e.to_string()))?;
            deletions.push(rel);
        }

        let rename_path = dir.join(RENAME_MANIFEST);
        let mut renames = Vec::new();
        for (line_no, line) in manifest::read_lines(&rename_path)? {
            let (old, new) = manifest::decode_rename_line(&line)
                .map_err(|reason| parse_error(&rename_path, line_no, reason))?;
            for rel in [&old, &new] {
                validate_relative(rel)
                    .map_err(|e| parse_error(&rename_path, line_no, e.to_string()))?;
            }
            renames.push((old, new));
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            deletions,
            renames,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn deletions(&self) -> &[String] {
        &self.deletions
    }

    pub fn renames(&self) -> &[(String, String)] {
        &self.renames
    }

    pub fn add_dir(&self) -> PathBuf {
        self.dir.join(ADD_DIR)
    }

    /// Relative paths of every file under `.add`, sorted. Empty if `.add` is absent.
    pub fn added_paths(&self) -> Result<Vec<String>, StorageError> {
        let add_dir = self.add_dir();
        if !add_dir.exists() {
            return Ok(Vec::new());
        }
        Ok(Walker::new(add_dir)
            .walk()?
            .into_iter()
            .map(|entry| entry.relative)
            .collect())
    }
}

fn parse_error(path: &Path, line: usize, reason: String) -> StorageError {
    StorageError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    }
}
