//! Command line smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("domain-radar").unwrap()
}

#[test]
fn test_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--batch-size"));
}

#[test]
fn test_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_requires_candidates() {
    cli().assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_rejects_blank_candidate() {
    cli()
        .arg("   ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be blank"));
}

#[test]
fn test_rejects_candidate_without_usable_characters() {
    cli()
        .args(["--batch-size", "1", "!!!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no usable domain characters"));
}
