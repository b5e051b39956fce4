// Integration tests for the credit-risk CLI surface: flags, help and
// argument validation.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to build a Command for the credit-risk binary.
fn credit_risk() -> Command {
    Command::cargo_bin("credit-risk").expect("binary should exist")
}

#[test]
fn cli_version_flag() {
    credit_risk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("credit-risk"));
}

#[test]
fn cli_help_flag() {
    credit_risk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("credit risk scoring"));
}

#[test]
fn assess_requires_profile() {
    credit_risk()
        .arg("assess")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn assess_rejects_unknown_format() {
    credit_risk()
        .args(["assess", "applicant.toml", "--format", "sarif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn quiet_conflicts_with_verbose() {
    credit_risk()
        .args(["-q", "-v", "bands"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
