//! CLI integration tests
//!
//! Tests the CLI binary end-to-end.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use common::assertions::{assert_file_exists, assert_on_branch};
use common::fixtures::{RepoliteBuilder, CONFIG_NAME};
use repolite::core::config::Config;

fn repolite() -> Command {
    let mut cmd = Command::cargo_bin("repolite").unwrap();
    cmd.env_remove("REPO_CFG").env_remove("RUST_LOG");
    cmd
}

/// Test that `repolite --help` works
#[test]
fn test_help() {
    repolite()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dependency repositories"));
}

/// Test that `repolite --version` works
#[test]
fn test_version() {
    repolite()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bad_config_extension_fails_early() {
    let temp = TempDir::new().unwrap();
    repolite()
        .current_dir(temp.path())
        .env("REPO_CFG", "testme.txt")
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config file extension: testme.txt"));
}

#[test]
fn test_config_dump_falls_back_to_example() {
    let temp = TempDir::new().unwrap();
    repolite()
        .current_dir(temp.path())
        .args(["config", "dump"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repo_name: repolite"))
        .stdout(predicate::str::contains("top_dir: ext"));
}

#[test]
fn test_config_save_writes_default_file() {
    let temp = TempDir::new().unwrap();
    repolite()
        .current_dir(temp.path())
        .args(["--quiet", "config", "save"])
        .assert()
        .success();
    let saved = Config::load(temp.path().join(CONFIG_NAME)).unwrap();
    assert_eq!(saved.top_dir, "ext");
}

#[test]
fn test_completions() {
    repolite()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repolite"));
}

#[test]
fn test_sync_show_lock_round_trip() {
    let fx = RepoliteBuilder::looney().build();
    fx.write_default_config();

    // no subcommand means sync
    repolite()
        .current_dir(&fx.work_dir)
        .arg("--quiet")
        .assert()
        .success();
    assert_on_branch(&fx.repo_path("porky"), "branch1");

    let output = repolite()
        .current_dir(&fx.work_dir)
        .args(["show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown[0]["repo"], "daffy");
    assert_eq!(shown[1]["branch"], "branch1");

    repolite()
        .current_dir(&fx.work_dir)
        .args(["--quiet", "lock"])
        .assert()
        .success();
    assert_file_exists(&fx.work_dir.join(".repolite-locked.yml"));

    repolite()
        .current_dir(&fx.work_dir)
        .args(["--quiet", "--config", ".repolite-locked.yml", "update"])
        .assert()
        .success();
}

#[test]
fn test_sync_reports_stray_directories() {
    let fx = RepoliteBuilder::looney().build();
    fx.write_default_config();
    std::fs::create_dir_all(fx.top_dir().join("stray")).unwrap();

    repolite()
        .current_dir(&fx.work_dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("not enabled repositories"));
    assert_on_branch(&fx.repo_path("daffy"), "main");
}

#[test]
fn test_show_on_mismatched_layout_exits_nonzero() {
    let fx = RepoliteBuilder::looney().build();
    fx.write_default_config();
    std::fs::create_dir_all(fx.repo_path("daffy")).unwrap();

    repolite()
        .current_dir(&fx.work_dir)
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directory mismatch"));
}

#[test]
fn test_locked_config_without_pins_exits_nonzero() {
    let fx = RepoliteBuilder::looney().build();
    fx.write_config("cfg-locked.yml", &fx.config());

    repolite()
        .current_dir(&fx.work_dir)
        .args(["--config", "cfg-locked.yml", "update"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repo_hash"));
}
