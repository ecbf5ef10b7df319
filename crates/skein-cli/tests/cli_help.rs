//! Integration tests for CLI help output.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    cargo_bin_cmd!("skein")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("thread"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_thread_help_lists_show_and_unroll() {
    cargo_bin_cmd!("skein")
        .args(["thread", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("unroll"));
}

#[test]
fn test_unknown_subcommand_fails() {
    cargo_bin_cmd!("skein").arg("compose").assert().failure();
}
