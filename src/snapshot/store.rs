//! Snapshot file persistence
//!
//! One line per file: `<fingerprint><two spaces><path>`, sorted by path, no
//! header. Paths with a backslash or newline use the escaped form described in
//! `crate::manifest`. The fingerprint is fixed-width hex and never contains a
//! space, so the first two-space run always ends the fingerprint and the rest
//! of the line (including further double spaces) is the path.

use crate::error::StorageError;
use crate::manifest;
use crate::snapshot::Snapshot;
use crate::tree::copy::ensure_parent;
use crate::tree::hasher::Fingerprint;
use crate::tree::path::validate_relative;
use std::path::Path;
use tracing::{debug, instrument};

/// Field separator between fingerprint and path
pub const FIELD_SEPARATOR: &str = "  ";

/// Reads and writes snapshot files
pub struct SnapshotStore;

impl SnapshotStore {
    /// Write `snapshot` to `path`, creating parent directories.
    #[instrument(skip(snapshot), fields(files = snapshot.len()))]
    pub fn save(snapshot: &Snapshot, path: &Path) -> Result<(), StorageError> {
        ensure_parent(path)?;
        let lines = snapshot
            .records()
            .map(|record| encode_line(&record.fingerprint, &record.relative_path));
        manifest::write_lines(path, lines)?;
        debug!("Snapshot saved");
        Ok(())
    }

    /// Read a snapshot file. The first malformed line aborts the load.
    #[instrument]
    pub fn load(path: &Path) -> Result<Snapshot, StorageError> {
        let mut snapshot = Snapshot::new();
        for (line_no, line) in manifest::read_lines(path)? {
            let parse_error = |reason: String| StorageError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                reason,
            };
            let (fingerprint, rel) = decode_line(&line).map_err(parse_error)?;
            validate_relative(&rel).map_err(|e| parse_error(e.to_string()))?;
            if snapshot.insert(rel.clone(), fingerprint).is_some() {
                return Err(parse_error(format!("duplicate path {:?}", rel)));
            }
        }
        debug!(files = snapshot.len(), "Snapshot loaded");
        Ok(snapshot)
    }
}

/// Format one snapshot entry (without the trailing newline).
pub fn encode_line(fingerprint: &Fingerprint, rel: &str) -> String {
    let body = format!(
        "{}{}{}",
        fingerprint,
        FIELD_SEPARATOR,
        manifest::escape_path(rel)
    );
    manifest::with_marker(body, manifest::needs_escape(rel))
}

/// Parse one snapshot line into fingerprint and relative path.
pub fn decode_line(line: &str) -> Result<(Fingerprint, String), String> {
    let (body, escaped) = manifest::strip_marker(line);
    let (fp, rel) = body
        .split_once(FIELD_SEPARATOR)
        .ok_or_else(|| "missing two-space separator".to_string())?;
    let fingerprint: Fingerprint = fp.parse()?;
    let rel = if escaped {
        manifest::unescape_path(rel)?
    } else {
        rel.to_string()
    };
    Ok((fingerprint, rel))
}
