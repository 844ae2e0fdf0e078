//! CLI surface tests

mod common;

use common::TestProject;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    let project = TestProject::new();
    project
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bundle"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("repo"))
        .stdout(predicate::str::contains("machine"));
}

#[test]
fn test_version_command() {
    let project = TestProject::new();
    project
        .cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    let project = TestProject::new();
    project.cmd().arg("frobnicate").assert().failure();
}

#[test]
fn test_completions_emit_script() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("packwright"));
}

#[test]
fn test_machine_add_flash_requires_geometry() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["machine", "add", "flash", "dapp-test-data"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--length"));
}

#[test]
fn test_bundle_requires_type_name_version() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["bundle", "some-file.ext2"])
        .assert()
        .failure();
}
