//! Property-based tests for diff determinism and codec invariants

use aofsync::diff::{diff_snapshots, DiffResult};
use aofsync::exclude::ExcludeSet;
use aofsync::manifest::{escape_path, unescape_path};
use aofsync::snapshot::store::{decode_line, encode_line};
use aofsync::snapshot::Snapshot;
use aofsync::tree::hasher::{fingerprint_bytes, Fingerprint};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Small path and content alphabets so renames and collisions actually happen.
fn snapshot_strategy() -> impl Strategy<Value = BTreeMap<String, u8>> {
    prop::collection::btree_map("[a-c]{1,2}(/[a-c]{1,2})?", 0u8..4, 0..10)
}

fn to_snapshot(files: &BTreeMap<String, u8>) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for (path, content) in files {
        snapshot.insert(path.clone(), fingerprint_bytes(&[*content]));
    }
    snapshot
}

/// Replay a diff on an in-memory tree the way the patcher does on disk.
fn replay(origin: &Snapshot, current: &Snapshot, diff: &DiffResult) -> BTreeMap<String, Fingerprint> {
    let mut tree: BTreeMap<String, Fingerprint> =
        origin.iter().map(|(p, fp)| (p.clone(), *fp)).collect();
    for path in &diff.deleted {
        tree.remove(path);
    }
    for (old, new) in &diff.renamed {
        let fp = tree.remove(old).unwrap();
        tree.insert(new.clone(), fp);
    }
    for path in &diff.added {
        tree.insert(path.clone(), *current.get(path).unwrap());
    }
    tree
}

#[test]
fn test_self_diff_is_empty_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&snapshot_strategy(), |files| {
            let snapshot = to_snapshot(&files);
            let diff = diff_snapshots(&snapshot, &snapshot, &ExcludeSet::empty());
            prop_assert!(diff.is_empty());
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_replayed_diff_reaches_current_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(snapshot_strategy(), snapshot_strategy()),
            |(origin_files, current_files)| {
                let origin = to_snapshot(&origin_files);
                let current = to_snapshot(&current_files);
                let diff = diff_snapshots(&origin, &current, &ExcludeSet::empty());

                let expected: BTreeMap<String, Fingerprint> =
                    current.iter().map(|(p, fp)| (p.clone(), *fp)).collect();
                prop_assert_eq!(replay(&origin, &current, &diff), expected);
                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_categories_are_disjoint_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(snapshot_strategy(), snapshot_strategy()),
            |(origin_files, current_files)| {
                let origin = to_snapshot(&origin_files);
                let current = to_snapshot(&current_files);
                let diff = diff_snapshots(&origin, &current, &ExcludeSet::empty());

                for path in &diff.deleted {
                    prop_assert!(!diff.added.contains(path));
                    prop_assert!(!current.contains(path));
                }
                for (old, new) in &diff.renamed {
                    prop_assert!(!diff.added.contains(old));
                    prop_assert!(!diff.deleted.contains(old));
                    prop_assert!(!current.contains(old));
                    prop_assert_eq!(origin.get(old), current.get(new));
                    // A rename target is also added only when it held other content before.
                    if diff.added.contains(new) {
                        prop_assert!(origin.contains(new));
                        prop_assert_ne!(origin.get(new), current.get(new));
                    }
                }
                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_rename_target_is_smallest_candidate_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(snapshot_strategy(), snapshot_strategy()),
            |(origin_files, current_files)| {
                let origin = to_snapshot(&origin_files);
                let current = to_snapshot(&current_files);
                let diff = diff_snapshots(&origin, &current, &ExcludeSet::empty());

                for (_, new) in &diff.renamed {
                    let fp = current.get(new).unwrap();
                    let smallest = current
                        .iter()
                        .filter(|(_, other)| *other == fp)
                        .map(|(p, _)| p)
                        .min()
                        .unwrap();
                    prop_assert_eq!(new, smallest);
                }
                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_path_escaping_is_lossless_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<String>(), |path| {
            let escaped = escape_path(&path);
            prop_assert!(!escaped.contains('\n'));
            prop_assert_eq!(unescape_path(&escaped).unwrap(), path);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_snapshot_line_preserves_awkward_paths_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(any::<Vec<u8>>(), "[a-z \\\\\\n]{1,8}"),
            |(content, path)| {
                let fp = fingerprint_bytes(&content);
                let line = encode_line(&fp, &path);
                prop_assert!(!line.contains('\n'));
                prop_assert_eq!(decode_line(&line).unwrap(), (fp, path));
                Ok(())
            },
        )
        .unwrap();
}
