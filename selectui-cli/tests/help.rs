use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("selectui");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("selectui"));
}

#[test]
fn rejects_missing_field_declarations() {
    let mut cmd = cargo::cargo_bin_cmd!("selectui");
    cmd.args(["--catalog", "{}"])
        .assert()
        .failure()
        .stderr(contains("--field"));
}
