//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global config file, then
//! `AOFSYNC_*` environment variables. An explicit `--config` file replaces the
//! global file. CLI flags are applied on top by the binary.

use crate::error::SyncError;
use crate::exclude::ExcludeSet;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::environment::ENV_PREFIX;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Snapshot, diff and patch settings
    #[serde(default)]
    pub sync: SyncSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings shared by freeze, diff and patch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Exclude glob patterns (see `crate::exclude` for matching rules)
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Fingerprint only the first N bytes of each file (0 = whole file).
    /// Must be the same at freeze and diff time.
    #[serde(default)]
    pub max_hash_size: u64,

    /// Remove files listed in a package's deletion manifest when patching
    #[serde(default)]
    pub delete: bool,
}

impl SyncSettings {
    /// Compile the exclude patterns
    pub fn exclude_set(&self) -> Result<ExcludeSet, SyncError> {
        ExcludeSet::new(&self.excludes)
    }
}

impl SyncConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        self.sync.exclude_set()?;

        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => {
                return Err(SyncError::ConfigError(format!(
                    "Invalid log format: {} (must be 'json' or 'text')",
                    other
                )))
            }
        }
        if self.logging.output == "file" && self.logging.file.is_none() {
            return Err(SyncError::ConfigError(
                "logging.output = \"file\" requires logging.file".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, SyncError> {
        toml::to_string_pretty(self).map_err(|e| SyncError::Output(e.to_string()))
    }
}
