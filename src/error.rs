//! Error types for the offline sync pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem and on-disk format errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Parse error in {path:?} line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Rename source missing: {old} -> {new}. The destination tree has diverged from the package origin.")]
    MissingRenameSource { old: String, new: String },

    #[error("Invalid package: {0}")]
    InvalidPackage(String),
}

impl StorageError {
    /// Wrap an `io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced by the freeze/diff/patch operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExclude { pattern: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::ConfigError(err.to_string())
    }
}
