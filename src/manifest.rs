//! Line codec for the snapshot file and the package manifests.
//!
//! Paths are written verbatim unless they contain a backslash or a newline.
//! In that case those characters are escaped as `\\` and `\n` and the whole
//! line gets a leading `\`, the convention used by `sha1sum`/`b3sum` check
//! files. Plain paths therefore keep the simple one-path-per-line layout.

use crate::error::StorageError;
use std::borrow::Cow;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Separator between the two paths of a rename manifest line
pub const RENAME_SEPARATOR: &str = " -> ";

/// Marker prefixed to lines that carry escaped paths
const ESCAPE_MARKER: char = '\\';

pub fn needs_escape(path: &str) -> bool {
    path.contains(['\\', '\n'])
}

pub fn escape_path(path: &str) -> Cow<'_, str> {
    if !needs_escape(path) {
        return Cow::Borrowed(path);
    }
    let mut out = String::with_capacity(path.len() + 2);
    for c in path.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

pub fn unescape_path(escaped: &str) -> Result<String, String> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some(other) => return Err(format!("invalid escape sequence '\\{}'", other)),
            None => return Err("dangling '\\' at end of path".to_string()),
        }
    }
    Ok(out)
}

/// Split off the escape marker. Returns the line body and whether paths in it are escaped.
pub fn strip_marker(line: &str) -> (&str, bool) {
    match line.strip_prefix(ESCAPE_MARKER) {
        Some(body) => (body, true),
        None => (line, false),
    }
}

/// Prefix `body` with the escape marker when `escaped` is set.
pub fn with_marker(body: String, escaped: bool) -> String {
    if escaped {
        let mut line = String::with_capacity(body.len() + 1);
        line.push(ESCAPE_MARKER);
        line.push_str(&body);
        line
    } else {
        body
    }
}

fn decode_field(field: &str, escaped: bool) -> Result<String, String> {
    if escaped {
        unescape_path(field)
    } else {
        Ok(field.to_string())
    }
}

pub fn encode_delete_line(path: &str) -> String {
    with_marker(escape_path(path).into_owned(), needs_escape(path))
}

pub fn decode_delete_line(line: &str) -> Result<String, String> {
    let (body, escaped) = strip_marker(line);
    decode_field(body, escaped)
}

/// Encode a rename pair. Paths containing the separator cannot be represented.
pub fn encode_rename_line(old: &str, new: &str) -> Result<String, StorageError> {
    for path in [old, new] {
        if path.contains(RENAME_SEPARATOR) {
            return Err(StorageError::InvalidPath(format!(
                "{:?} contains '{}' and cannot be written to a rename manifest",
                path, RENAME_SEPARATOR
            )));
        }
    }
    let escaped = needs_escape(old) || needs_escape(new);
    let body = format!(
        "{}{}{}",
        escape_path(old),
        RENAME_SEPARATOR,
        escape_path(new)
    );
    Ok(with_marker(body, escaped))
}

pub fn decode_rename_line(line: &str) -> Result<(String, String), String> {
    let (body, escaped) = strip_marker(line);
    let (old, new) = body
        .split_once(RENAME_SEPARATOR)
        .ok_or_else(|| format!("missing '{}' separator", RENAME_SEPARATOR))?;
    if new.contains(RENAME_SEPARATOR) {
        return Err(format!("more than one '{}' separator", RENAME_SEPARATOR));
    }
    Ok((decode_field(old, escaped)?, decode_field(new, escaped)?))
}

/// Read a manifest as `(line_number, line)` pairs, skipping empty lines.
///
/// Line numbers are 1-based. Only `\n` terminates a line.
pub fn read_lines(path: &Path) -> Result<Vec<(usize, String)>, StorageError> {
    let contents = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    Ok(contents
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect())
}

/// Write one line per item, each terminated by `\n`, replacing the file.
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<(), StorageError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = fs::File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer
            .write_all(line.as_ref().as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(|e| StorageError::io(path, e))?;
    }
    writer.flush().map_err(|e| StorageError::io(path, e))?;
    Ok(())
}
