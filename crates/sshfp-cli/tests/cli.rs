//! Argument handling of the `check_sshfp` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn check_sshfp() -> Command {
    Command::cargo_bin("check_sshfp").unwrap()
}

#[test]
fn missing_hostname_is_unknown() {
    check_sshfp()
        .assert()
        .code(3)
        .stdout(predicate::str::starts_with("SSHFP UNKNOWN: "))
        .stdout(predicate::str::contains("<HOSTNAME>"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn extra_argument_is_unknown() {
    check_sshfp()
        .args(["host.example.com", "other.example.com"])
        .assert()
        .code(3)
        .stdout(predicate::str::starts_with("SSHFP UNKNOWN: "));
}

#[test]
fn unknown_flag_is_unknown() {
    check_sshfp()
        .args(["--timeout", "5", "host.example.com"])
        .assert()
        .code(3)
        .stdout(predicate::str::starts_with("SSHFP UNKNOWN: "));
}

#[test]
fn help_exits_unknown() {
    check_sshfp()
        .arg("--help")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Usage: check_sshfp"));
}
