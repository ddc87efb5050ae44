//! CLI route: run context and the single route table dispatching to the sync API.

use crate::api;
use crate::cli::help::command_name;
use crate::cli::parse::{Cli, Commands};
use crate::cli::presentation::{
    format_diff_report, format_freeze_report, format_package_listing, format_patch_report,
};
use crate::config::{ConfigLoader, SyncConfig};
use crate::error::SyncError;
use std::time::Instant;
use tracing::{debug, info_span};

/// Load configuration for a CLI invocation and apply the CLI flags on top.
///
/// `--exclude` appends to configured excludes; `--max-hash-size` and
/// `--delete` override; logging flags override the logging section.
pub fn load_config(cli: &Cli) -> Result<SyncConfig, SyncError> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    config.sync.excludes.extend(cli.excludes.iter().cloned());
    if let Some(max) = cli.max_hash_size {
        config.sync.max_hash_size = max;
    }
    if cli.delete {
        config.sync.delete = true;
    }

    let logging = &mut config.logging;
    if cli.quiet {
        logging.enabled = false;
    }
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        logging.output = output.clone();
    }
    if let Some(file) = &cli.log_file {
        logging.file = Some(file.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Runtime context for CLI execution: effective configuration and report format.
pub struct RunContext {
    config: SyncConfig,
    format: String,
}

impl RunContext {
    pub fn new(config: SyncConfig, format: impl Into<String>) -> Self {
        Self {
            config,
            format: format.into(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table. Returns the report to print.
    pub fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        let span = info_span!("command", name = command_name(command));
        let _entered = span.enter();
        let started = Instant::now();

        let result = self.execute_inner(command);
        debug!(
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, SyncError> {
        let settings = &self.config.sync;
        let format = self.format.as_str();
        match command {
            Commands::Freeze {
                source_dir,
                state_file,
            } => {
                let report = api::freeze(source_dir, state_file, settings)?;
                format_freeze_report(&report, format)
            }
            Commands::Diff {
                source_dir,
                state_file,
                package_dir,
                dry_run,
            } => {
                let report = api::diff(source_dir, state_file, package_dir, settings, *dry_run)?;
                format_diff_report(&report, format)
            }
            Commands::Patch {
                package_dir,
                destination_dir,
            } => {
                let report = api::patch(package_dir, destination_dir, settings)?;
                format_patch_report(&report, format)
            }
            Commands::Show { package_dir } => {
                let listing = api::show(package_dir)?;
                format_package_listing(&listing, format)
            }
            Commands::Config => {
                if format == "json" {
                    serde_json::to_string_pretty(&self.config)
                        .map_err(|e| SyncError::Output(e.to_string()))
                } else {
                    self.config.to_toml()
                }
            }
        }
    }
}
