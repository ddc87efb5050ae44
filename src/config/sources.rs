//! Config sources, lowest to highest precedence: global file, environment.

pub mod environment;
pub mod global_file;
