//! Shared test utilities for integration tests
//!
//! Helpers to build small trees from `(path, content)` pairs and to read a
//! whole tree back for comparison.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Write `content` at the `/`-separated `rel` path under `root`, creating directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = rel.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Create a tree from `(relative path, content)` pairs.
pub fn build_tree(root: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(root).unwrap();
    for (rel, content) in files {
        write_file(root, rel, content);
    }
}

/// Read every regular file under `root` as relative path to bytes.
pub fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut out = BTreeMap::new();
    for entry in WalkDir::new(root) {
        let entry = entry.unwrap();
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap()
            .components()
            .map(|c| c.as_os_str().to_str().unwrap().to_string())
            .collect::<Vec<_>>()
            .join("/");
        out.insert(rel, fs::read(entry.path()).unwrap());
    }
    out
}

/// Recursively copy `src` to `dst`.
pub fn copy_tree(src: &Path, dst: &Path) {
    for (rel, bytes) in read_tree(src) {
        let path = rel.split('/').fold(dst.to_path_buf(), |acc, seg| acc.join(seg));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }
}
