//! CLI command-name contract for logging spans.

use crate::cli::parse::Commands;

/// Stable command name (e.g. "freeze", "patch").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Freeze { .. } => "freeze",
        Commands::Diff { .. } => "diff",
        Commands::Patch { .. } => "patch",
        Commands::Show { .. } => "show",
        Commands::Config => "config",
    }
}
