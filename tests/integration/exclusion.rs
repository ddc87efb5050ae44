//! Exclude rules apply the same way when freezing and when diffing

use aofsync::api;
use aofsync::config::SyncSettings;
use aofsync::snapshot::SnapshotStore;
use tempfile::TempDir;

use crate::integration::test_utils::{build_tree, write_file};

fn settings(excludes: &[&str]) -> SyncSettings {
    SyncSettings {
        excludes: excludes.iter().map(|s| s.to_string()).collect(),
        ..SyncSettings::default()
    }
}

#[test]
fn test_excluded_paths_are_absent_from_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let state = temp_dir.path().join("src.state");
    build_tree(
        &source,
        &[
            ("keep.txt", "k"),
            ("cache/blob", "c"),
            ("deep/cache/blob", "c2"),
            ("build/out.o", "o"),
            ("build/sub/out.o", "o2"),
            ("notes.tmp", "t"),
        ],
    );

    api::freeze(&source, &state, &settings(&["cache", "build/*.o", "*.tmp"])).unwrap();
    let snapshot = SnapshotStore::load(&state).unwrap();
    let paths: Vec<&str> = snapshot.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(paths, vec!["build/sub/out.o", "keep.txt"]);
}

#[test]
fn test_excluded_changes_never_appear_in_diff() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let state = temp_dir.path().join("src.state");
    build_tree(&source, &[("a.txt", "1"), ("log/app.log", "l1")]);

    let excludes = settings(&["*.log"]);
    api::freeze(&source, &state, &excludes).unwrap();
    write_file(&source, "log/app.log", "l2");
    write_file(&source, "log/new.log", "l3");

    assert!(api::compute_diff(&source, &state, &excludes).unwrap().is_empty());
}

#[test]
fn test_exclude_added_after_freeze_hides_stored_paths() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let state = temp_dir.path().join("src.state");
    build_tree(&source, &[("a.txt", "1"), ("secret/key", "k")]);

    // Frozen without excludes, diffed with one: the stored entry must not show as deleted.
    api::freeze(&source, &state, &SyncSettings::default()).unwrap();
    let diff = api::compute_diff(&source, &state, &settings(&["secret"])).unwrap();
    assert!(diff.is_empty());
}
