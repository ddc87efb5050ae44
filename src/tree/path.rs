//! Root-relative path handling
//!
//! Relative paths are stored as `/`-separated UTF-8 strings on every platform,
//! so snapshot files and packages move between machines unchanged.
//!
//! A file name that is not valid UTF-8 cannot be stored. `relative_path`
//! rejects it with `InvalidPath`, which aborts the freeze or diff; exclude the
//! name (or its directory) to snapshot the rest of the tree.

use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

/// Separator used in stored relative paths
pub const SEPARATOR: char = '/';

/// Convert an absolute walk entry into a root-relative path string.
pub fn relative_path(root: &Path, path: &Path) -> Result<String, StorageError> {
    let rel = path.strip_prefix(root).map_err(|_| {
        StorageError::InvalidPath(format!("{:?} is not under {:?}", path, root))
    })?;

    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(name) => {
                let name = name.to_str().ok_or_else(|| {
                    StorageError::InvalidPath(format!("non UTF-8 file name in {:?}", path))
                })?;
                segments.push(name);
            }
            Component::CurDir => {}
            _ => {
                return Err(StorageError::InvalidPath(format!(
                    "unexpected component in {:?}",
                    rel
                )))
            }
        }
    }

    if segments.is_empty() {
        return Err(StorageError::InvalidPath(format!(
            "{:?} is the root itself",
            path
        )));
    }
    Ok(segments.join("/"))
}

/// Check that a stored relative path stays inside the tree it is applied to.
///
/// Rejects empty paths, absolute paths, empty segments, `.` and `..`.
pub fn validate_relative(rel: &str) -> Result<(), StorageError> {
    if rel.is_empty() {
        return Err(StorageError::InvalidPath("empty relative path".to_string()));
    }
    for segment in rel.split(SEPARATOR) {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(StorageError::InvalidPath(format!(
                "relative path {:?} must not contain empty, '.' or '..' segments",
                rel
            )));
        }
        if segment.contains('\\') && cfg!(windows) {
            return Err(StorageError::InvalidPath(format!(
                "relative path {:?} contains a Windows separator",
                rel
            )));
        }
    }
    Ok(())
}

/// Resolve a stored relative path under `root`.
pub fn join_relative(root: &Path, rel: &str) -> PathBuf {
    let mut out = root.to_path_buf();
    for segment in rel.split(SEPARATOR) {
        out.push(segment);
    }
    out
}
