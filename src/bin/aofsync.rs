//! aofsync CLI Binary
//!
//! Command-line interface for freezing, diffing and patching directory trees.

use aofsync::cli::{load_config, map_error, Cli, RunContext};
use aofsync::logging::init_logging;
use clap::Parser;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Configuration errors are reported before logging exists.
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("aofsync starting");

    let context = RunContext::new(config, cli.format.clone());
    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}
