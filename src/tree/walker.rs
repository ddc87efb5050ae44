//! Filesystem walker for enumerating the regular files of a tree

use crate::error::StorageError;
use crate::exclude::ExcludeSet;
use crate::tree::path;
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

/// A regular file found under the walk root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Absolute (root-joined) path used for reading
    pub path: PathBuf,
    /// Root-relative `/`-separated path
    pub relative: String,
}

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: true, a link to a file counts as that file)
    pub follow_symlinks: bool,
    /// Paths to leave out of the walk
    pub excludes: ExcludeSet,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            excludes: ExcludeSet::empty(),
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the tree and collect every non-excluded regular file.
    ///
    /// Excluded directories are pruned without being descended into.
    /// Returned entries are sorted by relative path.
    pub fn walk(&self) -> Result<Vec<Entry>, StorageError> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| StorageError::io(&self.root, e))?;
        if !metadata.is_dir() {
            return Err(StorageError::InvalidPath(format!(
                "{:?} is not a directory",
                self.root
            )));
        }

        let mut entries = Vec::new();
        let excludes = &self.config.excludes;
        let root = &self.root;

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                match path::relative_path(root, entry.path()) {
                    Ok(rel) if excludes.is_excluded(&rel) => {
                        trace!(path = %rel, "Excluded");
                        false
                    }
                    _ => true,
                }
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let at = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| {
                        std::io::Error::new(
                            std::io::ErrorKind::Other,
                            "filesystem loop detected while walking",
                        )
                    });
                StorageError::io(at, source)
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = path::relative_path(root, entry.path())?;
            entries.push(Entry {
                path: entry.path().to_path_buf(),
                relative,
            });
        }

        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(entries)
    }
}
