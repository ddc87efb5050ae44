//! Integration tests for freeze, diff and patch

mod cli_binary;
mod exclusion;
pub mod test_utils;
