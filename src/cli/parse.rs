//! CLI parse: clap types for aofsync. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aofsync - offline directory sync
#[derive(Parser, Debug)]
#[command(name = "aofsync", version)]
#[command(about = "Freeze a directory tree, package its changes, patch them into another tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Exclude glob pattern (repeatable; added to configured excludes)
    #[arg(short = 'e', long = "exclude", global = true, value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Fingerprint only the first N bytes of each file (0 = whole file)
    #[arg(short = 'M', long, global = true, value_name = "BYTES")]
    pub max_hash_size: Option<u64>,

    /// Delete files listed in the package when patching
    #[arg(short = 'd', long, global = true)]
    pub delete: bool,

    /// Report format (text or json)
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Configuration file path (replaces the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Snapshot SOURCE_DIR into STATE_FILE
    Freeze {
        source_dir: PathBuf,
        state_file: PathBuf,
    },
    /// Compare SOURCE_DIR with STATE_FILE and write a diff package to PACKAGE_DIR
    Diff {
        source_dir: PathBuf,
        state_file: PathBuf,
        package_dir: PathBuf,
        /// Report the changes without writing the package
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply the package in PACKAGE_DIR to DESTINATION_DIR
    Patch {
        package_dir: PathBuf,
        destination_dir: PathBuf,
    },
    /// List the contents of a diff package
    Show { package_dir: PathBuf },
    /// Print the effective configuration
    Config,
}
