//! Binary-level smoke tests.
//!
//! These exercise the compiled binary: help output, argument validation,
//! and offline behaviors that never reach the network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stratus() -> (Command, TempDir) {
    let home = TempDir::new().expect("temp home");
    let mut cmd = Command::cargo_bin("stratus").expect("binary builds");
    cmd.env("STRATUS_HOME", home.path());
    (cmd, home)
}

#[test]
fn help_lists_commands() {
    let (mut cmd, _home) = stratus();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("target"))
        .stdout(predicate::str::contains("delete-space"))
        .stdout(predicate::str::contains("scale"));
}

#[test]
fn bare_target_reports_no_target() {
    let (mut cmd, _home) = stratus();
    cmd.arg("target")
        .assert()
        .success()
        .stdout(predicate::str::contains("No target set"));
}

#[test]
fn commands_refuse_to_run_untargeted() {
    let (mut cmd, _home) = stratus();
    cmd.arg("orgs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("stratus target"));
}

#[test]
fn delete_org_requires_at_least_one_name() {
    let (mut cmd, _home) = stratus();
    cmd.arg("delete-org").assert().failure();
}

#[test]
fn unknown_command_fails() {
    let (mut cmd, _home) = stratus();
    cmd.arg("frobnicate").assert().failure();
}

#[test]
fn completion_generates_a_script() {
    let (mut cmd, _home) = stratus();
    cmd.args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stratus"));
}

#[test]
fn target_url_persists_across_invocations() {
    let home = TempDir::new().expect("temp home");

    let mut set = Command::cargo_bin("stratus").unwrap();
    set.env("STRATUS_HOME", home.path())
        .args(["target", "api.stratus.example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Setting target to https://api.stratus.example.com",
        ));

    let mut show = Command::cargo_bin("stratus").unwrap();
    show.env("STRATUS_HOME", home.path())
        .arg("target")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.stratus.example.com"));
}
