//! Shared helpers for integration tests

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated packwright home and project directory pair.
///
/// Every spawned command gets its own PACKWRIGHT_HOME, so tests never
/// touch the invoking user's real configuration and can run in parallel.
pub struct TestProject {
    temp: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("project")).unwrap();
        Self { temp }
    }

    pub fn home(&self) -> PathBuf {
        self.temp.path().join("home")
    }

    pub fn project(&self) -> PathBuf {
        self.temp.path().join("project")
    }

    /// A packwright invocation rooted in this project
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("packwright").unwrap();
        cmd.env("PACKWRIGHT_HOME", self.home());
        cmd.current_dir(self.project());
        cmd
    }

    /// Drop a file into the project directory
    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.project().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}
