//! CLI domain: parse, route, help, output, and presentation only.
//! No sync logic; a single route table dispatches to `crate::api`.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_diff_report, format_freeze_report, format_package_listing, format_patch_report,
};
pub use route::{load_config, RunContext};
