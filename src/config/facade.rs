//! ConfigLoader: builds `SyncConfig` from the layered sources.

use super::merge::merge_policy;
use super::sources::{environment, global_file};
use super::SyncConfig;
use crate::error::SyncError;
use config::{File, FileFormat};
use std::path::Path;

/// Loads and validates configuration
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global config file, then `AOFSYNC_*` environment.
    pub fn load() -> Result<SyncConfig, SyncError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder);
        let builder = environment::add_to_builder(builder);
        let config: SyncConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `path` (TOML, must exist), then `AOFSYNC_*` environment.
    pub fn load_from_file(path: &Path) -> Result<SyncConfig, SyncError> {
        if !path.is_file() {
            return Err(SyncError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        let builder = environment::add_to_builder(builder);
        let config: SyncConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
