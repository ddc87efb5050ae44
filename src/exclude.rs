//! Exclude rules shared by snapshotting and diffing.
//!
//! Every rule is matched against a root-relative, `/`-separated path, so the
//! walker and the diff engine agree on what is excluded:
//!
//! - a pattern without `/` (e.g. `*.log`, `node_modules`) matches any single
//!   segment of the path; matching a directory name excludes its subtree;
//! - a pattern with `/` (e.g. `build/*.o`, `docs/**/draft.md`) matches the
//!   whole relative path or one of its directory prefixes. `*` stays within a
//!   segment, `**` spans segments.
//!
//! A leading `/` or `./` and a trailing `/` are dropped from patterns.

use crate::error::SyncError;
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
enum Rule {
    Segment(Pattern),
    Path(Pattern),
}

/// Compiled list of exclude rules
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    rules: Vec<Rule>,
}

impl ExcludeSet {
    /// Compile exclude patterns. Blank patterns are ignored.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, SyncError> {
        let mut rules = Vec::new();
        for raw in patterns {
            let raw = raw.as_ref();
            let pattern = normalize_pattern(raw);
            if pattern.is_empty() {
                continue;
            }
            let compiled = Pattern::new(pattern).map_err(|e| SyncError::InvalidExclude {
                pattern: raw.to_string(),
                reason: e.to_string(),
            })?;
            if pattern.contains('/') {
                rules.push(Rule::Path(compiled));
            } else {
                rules.push(Rule::Segment(compiled));
            }
        }
        Ok(Self { rules })
    }

    /// An empty set that excludes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether a root-relative path (file or directory) is excluded.
    pub fn is_excluded(&self, rel: &str) -> bool {
        self.rules.iter().any(|rule| match rule {
            Rule::Segment(p) => rel.split('/').any(|seg| p.matches_with(seg, MATCH_OPTIONS)),
            Rule::Path(p) => {
                p.matches_with(rel, MATCH_OPTIONS)
                    || rel
                        .match_indices('/')
                        .any(|(i, _)| p.matches_with(&rel[..i], MATCH_OPTIONS))
            }
        })
    }
}

fn normalize_pattern(raw: &str) -> &str {
    let mut p = raw.trim();
    loop {
        if let Some(rest) = p.strip_prefix("./") {
            p = rest;
        } else if let Some(rest) = p.strip_prefix('/') {
            p = rest;
        } else {
            break;
        }
    }
    p.trim_end_matches('/')
}
