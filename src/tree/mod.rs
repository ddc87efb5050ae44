//! Filesystem access for sync trees
//!
//! Walking, fingerprinting, relative path handling and metadata-preserving
//! copies. Everything above this module works with root-relative paths only.

pub mod copy;
pub mod hasher;
pub mod path;
pub mod walker;
