//! Command-line Tests
//!
//! Spawn the server binary to check argument handling and startup failures.

#![allow(deprecated)] // Allow deprecated cargo_bin for now

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_options() {
    Command::cargo_bin("codiny-server")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--completion-key"))
        .stdout(predicate::str::contains("--app-url"));
}

#[test]
fn test_version() {
    Command::cargo_bin("codiny-server")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_completion_key_fails_startup() {
    let data = TempDir::new().unwrap();

    Command::cargo_bin("codiny-server")
        .unwrap()
        .current_dir(data.path())
        .env_remove("COMPLETION_API_KEY")
        .arg("--data-dir")
        .arg(data.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Completion API key is required"));
}

#[test]
fn test_rejects_unknown_log_format() {
    Command::cargo_bin("codiny-server")
        .unwrap()
        .args(["--log-format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
