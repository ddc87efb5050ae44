//! Environment source: AOFSYNC_SYNC__MAX_HASH_SIZE=4096, AOFSYNC_SYNC__EXCLUDES=".git,*.tmp"

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Prefix shared by every configuration environment variable
pub const ENV_PREFIX: &str = "AOFSYNC";

/// Add `AOFSYNC_*` variables to builder. Nested keys use `__`, lists use `,`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("sync.excludes"),
    )
}
