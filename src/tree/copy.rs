//! Metadata-preserving file copies

use crate::error::StorageError;
use std::fs::{self, File, FileTimes, OpenOptions};
use std::path::Path;

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
    }
    Ok(())
}

/// Copy `src` to `dst`, replacing any existing file at `dst`.
///
/// Content is copied byte for byte (symlinks at `src` are followed), then the
/// source permissions and access/modification times are applied to `dst`.
/// Returns the number of bytes copied.
pub fn copy_preserving_metadata(src: &Path, dst: &Path) -> Result<u64, StorageError> {
    ensure_parent(dst)?;

    // A read-only file at the target would make the copy fail.
    if let Ok(existing) = fs::symlink_metadata(dst) {
        if !existing.is_dir() {
            fs::remove_file(dst).map_err(|e| StorageError::io(dst, e))?;
        }
    }

    let bytes = fs::copy(src, dst).map_err(|e| StorageError::io(dst, e))?;
    let metadata = fs::metadata(src).map_err(|e| StorageError::io(src, e))?;

    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    let file = OpenOptions::new()
        .write(true)
        .open(dst)
        .or_else(|_| File::open(dst))
        .map_err(|e| StorageError::io(dst, e))?;
    file.set_times(times).map_err(|e| StorageError::io(dst, e))?;
    drop(file);

    fs::set_permissions(dst, metadata.permissions()).map_err(|e| StorageError::io(dst, e))?;
    Ok(bytes)
}
