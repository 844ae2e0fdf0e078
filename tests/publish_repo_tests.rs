//! Publish and repo management flows

mod common;

use common::TestProject;
use predicates::prelude::*;

#[test]
fn test_publish_unknown_bundle_fails() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["publish", "uri", "ghost", "https://example.com/ghost.ext2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown bundle: ghost"));
}

#[test]
fn test_publish_disk_copies_content() {
    let project = TestProject::new();
    project.write_file("data.ext2", b"disk-published content");
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
        .stdout(predicate::str::contains("uploaded:"));

    // one content directory, holding the copied file
    let entries: Vec<_> = std::fs::read_dir(&published).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let content_dir = entries[0].as_ref().unwrap().path();
    assert_eq!(
        std::fs::read(content_dir.join("data.ext2")).unwrap(),
        b"disk-published content"
    );
}

#[test]
fn test_publish_disk_nosave_registers_without_copying() {
    let project = TestProject::new();
    project.write_file("data.ext2", b"registered only");
    project
        .cmd()
        .args(["bundle", "-t", "flashdrive", "-n", "data", "-v", "1.0.0", "data.ext2"])
        .assert()
        .success();

    let published = project.project().join("published");
    project
        .cmd()
        .args([
            "publish",
            "disk",
            "data",
            published.to_str().unwrap(),
            "--nosave",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("published:"))
        .stdout(predicate::str::contains("uploaded:").not());

    // target tree exists but no content was copied into it
    assert!(std::fs::read_dir(&published).unwrap().next().is_none());
}

#[test]
fn test_repo_add_unreachable_source_fails() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["repo", "add", "/nonexistent/repo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Listing source unreachable"));

    // the failed source must not linger in the registry
    assert!(!project.home().join("repos.json").exists());
}

#[test]
fn test_repo_update_unknown_source_fails() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["repo", "update", "/never/added"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

#[test]
fn test_repo_rm_unknown_source_fails() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["repo", "rm", "/never/added"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

#[test]
fn test_repo_add_shares_listings_between_hosts() {
    // host one publishes into its own global listing
    let host1 = TestProject::new();
    host1.write_file("data.ext2", b"shared bundle content");
    host1
        .cmd()
        .args(["bundle", "-t", "flashdrive", "-n", "data", "-v", "1.0.0", "data.ext2"])
        .assert()
        .success();
    let published = host1.project().join("published");
    host1
        .cmd()
        .args(["publish", "disk", "data", published.to_str().unwrap()])
        .assert()
        .success();

    // host two registers host one's home directory as a listing source
    let host2 = TestProject::new();
    host2
        .cmd()
        .args(["repo", "add", host1.home().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("repo added:"));

    host2
        .cmd()
        .args(["fetch", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flashdrive:data@1.0.0#blake3:"));

    // install fetches from the published disk location and verifies digests
    host2
        .cmd()
        .args(["install", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("installed:"));

    let local = host2.project().join(".packwright").join("bundles.json");
    assert!(std::fs::read_to_string(local).unwrap().contains("\"local\""));
}

#[test]
fn test_repo_rm_drops_contributed_entries() {
    let host1 = TestProject::new();
    host1.write_file("data.ext2", b"removable content");
    host1
        .cmd()
        .args(["bundle", "-t", "flashdrive", "-n", "data", "-v", "1.0.0", "data.ext2"])
        .assert()
        .success();
    host1
        .cmd()
        .args(["publish", "uri", "data", "https://example.com/data.ext2"])
        .assert()
        .success();

    let host2 = TestProject::new();
    let source = host1.home();
    host2
        .cmd()
        .args(["repo", "add", source.to_str().unwrap()])
        .assert()
        .success();
    host2.cmd().args(["fetch", "data"]).assert().success();

    host2
        .cmd()
        .args(["repo", "rm", source.to_str().unwrap()])
        .assert()
        .success();
    host2
        .cmd()
        .args(["fetch", "data"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown bundle"));
}

#[test]
fn test_repo_update_picks_up_new_entries() {
    let host1 = TestProject::new();
    host1.write_file("one.ext2", b"first bundle");
    host1
        .cmd()
        .args(["bundle", "-t", "flashdrive", "-n", "one", "-v", "1.0.0", "one.ext2"])
        .assert()
        .success();
    host1
        .cmd()
        .args(["publish", "uri", "one", "https://example.com/one.ext2"])
        .assert()
        .success();

    let host2 = TestProject::new();
    host2
        .cmd()
        .args(["repo", "add", host1.home().to_str().unwrap()])
        .assert()
        .success();

    // host one publishes another bundle after the add
    host1.write_file("two.ext2", b"second bundle");
    host1
        .cmd()
        .args(["bundle", "-t", "flashdrive", "-n", "two", "-v", "1.0.0", "two.ext2"])
        .assert()
        .success();
    host1
        .cmd()
        .args(["publish", "uri", "two", "https://example.com/two.ext2"])
        .assert()
        .success();

    // invisible until the cached listing is refreshed
    host2.cmd().args(["fetch", "two"]).assert().failure();
    host2
        .cmd()
        .args(["repo", "update"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated: 1 repo(s)"));
    host2.cmd().args(["fetch", "two"]).assert().success();
}
