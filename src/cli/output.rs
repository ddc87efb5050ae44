//! CLI output: error mapping from domain errors to the stderr diagnostic.

use crate::error::SyncError;

/// Map domain errors to the single line printed on failure.
pub fn map_error(e: &SyncError) -> String {
    format!("aofsync: error: {}", e)
}
