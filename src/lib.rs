//! aofsync: Another Offline File Sync
//!
//! Snapshot a directory tree's content, compare the tree against that snapshot
//! later, and package the changes (deletions, content-inferred renames, added
//! or replaced files) so they can be replayed onto another copy of the tree
//! without both trees ever being reachable at the same time.

pub mod api;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod exclude;
pub mod logging;
pub mod manifest;
pub mod package;
pub mod patch;
pub mod snapshot;
pub mod tree;
