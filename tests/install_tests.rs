//! Bundle creation and install flows

mod common;

use common::TestProject;
use predicates::prelude::*;

#[test]
fn test_bundle_registers_locally_and_stores_content() {
    let project = TestProject::new();
    project.write_file("dapp-test-data.ext2", b"hello world flash drive");

    project
        .cmd()
        .args([
            "bundle",
            "-t",
            "flashdrive",
            "-n",
            "dapp-test-data",
            "-v",
            "1.0.0",
            "dapp-test-data.ext2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("bundled:"))
        .stdout(predicate::str::contains("flashdrive:dapp-test-data@1.0.0#blake3:"));

    let local = project.project().join(".packwright").join("bundles.json");
    let listing = std::fs::read_to_string(local).unwrap();
    assert!(listing.contains("\"dapp-test-data\""));
    assert!(listing.contains("\"uri\": \"local\""));

    // content landed in the store, addressed by digest
    assert!(project.home().join("storage").is_dir());
}

#[test]
fn test_bundle_missing_file_fails() {
    let project = TestProject::new();
    project
        .cmd()
        .args([
            "bundle",
            "-t",
            "flashdrive",
            "-n",
            "ghost",
            "-v",
            "1.0.0",
            "nonexistent.ext2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_install_unknown_bundle_fails() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["install", "no-such-bundle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown bundle: no-such-bundle"));
}

#[test]
fn test_local_bundles_are_not_globally_installable() {
    let project = TestProject::new();
    project.write_file("data.ext2", b"project-only data");
    project
        .cmd()
        .args(["bundle", "-t", "flashdrive", "-n", "data", "-v", "1.0.0", "data.ext2"])
        .assert()
        .success();

    // bundling registers locally; installing resolves against global listings
    project
        .cmd()
        .args(["install", "data"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown bundle"));
}

#[test]
fn test_publish_then_install_is_idempotent() {
    let project = TestProject::new();
    project.write_file("data.ext2", b"published data");
    project
        .cmd()
        .args(["bundle", "-t", "flashdrive", "-n", "data", "-v", "1.0.0", "data.ext2"])
        .assert()
        .success();

    let published = project.project().join("published");
    project
        .cmd()
        .args(["publish", "disk", "data", published.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("published:"));

    // content is already in the store, so install needs no fetch
    project
        .cmd()
        .args(["install", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("installed:"));

    project
        .cmd()
        .args(["install", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("installed:"));
}

#[test]
fn test_fetch_shows_published_listing() {
    let project = TestProject::new();
    project.write_file("data.ext2", b"fetchable data");
    project
        .cmd()
        .args(["bundle", "-t", "rom", "-n", "data", "-v", "2.0.0", "data.ext2"])
        .assert()
        .success();
    project
        .cmd()
        .args(["publish", "uri", "data", "https://example.com/data.ext2"])
        .assert()
        .success();

    project
        .cmd()
        .args(["fetch", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rom:data@2.0.0#blake3:"))
        .stdout(predicate::str::contains("https://example.com/data.ext2"));
}

#[test]
fn test_fetch_unknown_name_fails() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["fetch", "nothing-here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown bundle"));
}
