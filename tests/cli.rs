//! End-to-end checks of the `renby` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Binary command isolated from the user's stored settings
fn renby(settings: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("renby").unwrap();
    cmd.env("RENBY_SETTINGS", settings.path().join("settings.db"))
        .env_remove("RUST_LOG");
    cmd
}

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn seed(dir: &Path) {
    fs::write(dir.join("big.txt"), vec![b'x'; 300]).unwrap();
    fs::write(dir.join("small.txt"), vec![b'x'; 10]).unwrap();
    fs::write(dir.join("mid.txt"), vec![b'x'; 100]).unwrap();
}

#[test]
fn renames_by_size_with_default_pattern() {
    let settings = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    seed(work.path());

    renby(&settings)
        .current_dir(work.path())
        .args(["size", "*.txt"])
        .assert()
        .success();

    assert_eq!(
        names(work.path()),
        vec!["000001.txt", "000002.txt", "000003.txt"]
    );
    assert_eq!(fs::metadata(work.path().join("000001.txt")).unwrap().len(), 10);
}

#[test]
fn dry_run_lists_plan_only() {
    let settings = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    seed(work.path());

    renby(&settings)
        .current_dir(work.path())
        .args(["size", "-n", "-r", "-p", "00", "--pre", "f", "*.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("big.txt -> "))
        .stdout(predicate::str::contains("f01.txt"))
        .stdout(predicate::str::contains("f03.txt"));

    assert_eq!(names(work.path()), vec!["big.txt", "mid.txt", "small.txt"]);
}

#[test]
fn negative_init_fails_without_changes() {
    let settings = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    seed(work.path());

    renby(&settings)
        .current_dir(work.path())
        .args(["mtime", "--init", "-1", "*.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "invalid options: init value must be non-negative",
        ));

    assert_eq!(names(work.path()), vec!["big.txt", "mid.txt", "small.txt"]);
}

#[test]
fn conflict_reported_without_force() {
    let settings = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    seed(work.path());
    fs::write(work.path().join("2.log"), b"keep").unwrap();
    fs::write(work.path().join("a.log"), b"a").unwrap();
    fs::write(work.path().join("b.log"), b"bb").unwrap();

    renby(&settings)
        .current_dir(work.path())
        .args(["size", "-p", "0", "a.log", "b.log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("conflicts detected"));
    assert_eq!(fs::read(work.path().join("2.log")).unwrap(), b"keep");

    renby(&settings)
        .current_dir(work.path())
        .args(["size", "-p", "0", "--force", "a.log", "b.log"])
        .assert()
        .success();
    assert_eq!(fs::read(work.path().join("2.log")).unwrap(), b"bb");
    assert_eq!(fs::read(work.path().join("1.log")).unwrap(), b"a");
}

#[test]
fn match_filter_limits_the_batch() {
    let settings = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    seed(work.path());

    renby(&settings)
        .current_dir(work.path())
        .args(["size", "-p", "0", "--match", "^(big|small)", "*.txt"])
        .assert()
        .success();

    assert_eq!(names(work.path()), vec!["1.txt", "2.txt", "mid.txt"]);
}

#[test]
fn stored_settings_apply_to_later_runs() {
    let settings = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    seed(work.path());

    renby(&settings)
        .args(["config", "set", "pattern", "xx"])
        .assert()
        .success();
    renby(&settings)
        .args(["config", "set", "pre", "img_"])
        .assert()
        .success();
    renby(&settings)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pattern = \"xx\""));

    renby(&settings)
        .current_dir(work.path())
        .args(["size", "--init", "9", "*.txt"])
        .assert()
        .success();

    assert_eq!(
        names(work.path()),
        vec!["img_09.txt", "img_0a.txt", "img_0b.txt"]
    );

    renby(&settings)
        .args(["config", "reset"])
        .assert()
        .success();
    renby(&settings)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pattern (unset)"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let settings = TempDir::new().unwrap();
    renby(&settings)
        .args(["name", "*.txt"])
        .assert()
        .code(2);
}

#[test]
fn unmatched_pattern_is_a_quiet_no_op() {
    let settings = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    renby(&settings)
        .current_dir(work.path())
        .args(["ctime", "*.none"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no files matched"));
}
