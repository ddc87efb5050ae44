//! Integration tests driving the aofsync binary.
//!
//! Each run gets its own XDG_CONFIG_HOME and HOME so a user's global config
//! file never leaks into the test.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::integration::test_utils::{build_tree, copy_tree, read_tree, write_file};

fn run(env_root: &Path, args: &[&str]) -> Output {
    let config_home = env_root.join("config");
    let home = env_root.join("home");
    fs::create_dir_all(&config_home).unwrap();
    fs::create_dir_all(&home).unwrap();

    let bin = env!("CARGO_BIN_EXE_aofsync");
    Command::new(bin)
        .env("XDG_CONFIG_HOME", config_home.as_os_str())
        .env("HOME", home.as_os_str())
        .env_remove("AOFSYNC_LOG")
        .env_remove("AOFSYNC_SYNC__EXCLUDES")
        .env_remove("AOFSYNC_SYNC__DELETE")
        .env_remove("AOFSYNC_SYNC__MAX_HASH_SIZE")
        .args(args)
        .output()
        .unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_freeze_diff_patch_round() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let replica = temp_dir.path().join("replica");
    let state = temp_dir.path().join("src.state");
    let package = temp_dir.path().join("pkg");

    build_tree(&source, &[("a.txt", "hello"), ("b.txt", "world")]);
    copy_tree(&source, &replica);

    let output = run(
        temp_dir.path(),
        &["freeze", path_arg(&source), path_arg(&state)],
    );
    assert!(
        output.status.success(),
        "freeze should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(state.is_file());

    fs::rename(source.join("b.txt"), source.join("c.txt")).unwrap();
    fs::remove_file(source.join("a.txt")).unwrap();
    write_file(&source, "d.txt", "new");

    let output = run(
        temp_dir.path(),
        &["diff", path_arg(&source), path_arg(&state), path_arg(&package)],
    );
    assert!(
        output.status.success(),
        "diff should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("D  a.txt"));
    assert!(stdout.contains("R  b.txt -> c.txt"));
    assert!(stdout.contains("A  d.txt"));

    let output = run(
        temp_dir.path(),
        &["patch", "--delete", path_arg(&package), path_arg(&replica)],
    );
    assert!(
        output.status.success(),
        "patch should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(read_tree(&replica), read_tree(&source));
}

#[test]
fn test_dry_run_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let state = temp_dir.path().join("src.state");
    let package = temp_dir.path().join("pkg");

    build_tree(&source, &[("a.txt", "hello")]);
    let output = run(
        temp_dir.path(),
        &["freeze", path_arg(&source), path_arg(&state)],
    );
    assert!(output.status.success());
    write_file(&source, "new.txt", "n");

    let output = run(
        temp_dir.path(),
        &[
            "--format",
            "json",
            "diff",
            "--dry-run",
            path_arg(&source),
            path_arg(&state),
            path_arg(&package),
        ],
    );
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["added"], serde_json::json!(["new.txt"]));
    assert!(value["package"].is_null());
    assert!(!package.exists());
}

#[test]
fn test_exclude_flag_is_applied() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let state = temp_dir.path().join("src.state");
    build_tree(&source, &[("keep.txt", "k"), ("skip.tmp", "s")]);

    let output = run(
        temp_dir.path(),
        &["-e", "*.tmp", "freeze", path_arg(&source), path_arg(&state)],
    );
    assert!(output.status.success());
    let content = fs::read_to_string(&state).unwrap();
    assert!(content.contains("keep.txt"));
    assert!(!content.contains("skip.tmp"));
}

#[test]
fn test_config_file_supplies_excludes() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let state = temp_dir.path().join("src.state");
    let config = temp_dir.path().join("aofsync.toml");
    build_tree(&source, &[("keep.txt", "k"), ("cache/blob", "c")]);
    fs::write(&config, "[sync]\nexcludes = [\"cache\"]\n").unwrap();

    let output = run(
        temp_dir.path(),
        &[
            "--config",
            path_arg(&config),
            "freeze",
            path_arg(&source),
            path_arg(&state),
        ],
    );
    assert!(
        output.status.success(),
        "freeze with config should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let content = fs::read_to_string(&state).unwrap();
    assert!(!content.contains("cache/blob"));
}

#[test]
fn test_missing_source_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist");
    let state = temp_dir.path().join("x.state");

    let output = run(
        temp_dir.path(),
        &["--quiet", "freeze", path_arg(&missing), path_arg(&state)],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("aofsync: error:"),
        "stderr should carry the error line; got: {}",
        stderr
    );
    assert!(!state.exists());
}

#[test]
fn test_patch_with_diverged_destination_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    let replica = temp_dir.path().join("replica");
    let state = temp_dir.path().join("src.state");
    let package = temp_dir.path().join("pkg");

    build_tree(&source, &[("a.txt", "content")]);
    build_tree(&replica, &[("other.txt", "o")]);
    assert!(run(temp_dir.path(), &["freeze", path_arg(&source), path_arg(&state)])
        .status
        .success());
    fs::rename(source.join("a.txt"), source.join("b.txt")).unwrap();
    assert!(run(
        temp_dir.path(),
        &["diff", path_arg(&source), path_arg(&state), path_arg(&package)],
    )
    .status
    .success());

    let output = run(
        temp_dir.path(),
        &["--quiet", "patch", path_arg(&package), path_arg(&replica)],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("a.txt"), "stderr: {}", stderr);
}
