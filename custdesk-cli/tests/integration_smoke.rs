//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help() {
    let mut cmd = Command::cargo_bin("custdesk").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("custdesk").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--cors-origin"))
        .stdout(predicate::str::contains("--lazy-connect"))
        .stdout(predicate::str::contains("MYSQL_HOST"));
}

#[test]
fn test_check_help() {
    let mut cmd = Command::cargo_bin("custdesk").unwrap();
    cmd.arg("check").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--ssl-ca"))
        .stdout(predicate::str::contains("--pool-size"));
}

#[test]
fn test_password_env_value_hidden() {
    let mut cmd = Command::cargo_bin("custdesk").unwrap();
    cmd.env("MYSQL_PASSWORD", "s3cret-value")
        .arg("check")
        .arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s3cret-value").not());
}

#[test]
fn test_serve_rejects_bad_bind() {
    let mut cmd = Command::cargo_bin("custdesk").unwrap();
    cmd.arg("serve").arg("--bind").arg("not-an-address");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
