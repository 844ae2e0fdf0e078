//! Retrieval strategy selection
//!
//! Classifies a uri into one of three fetch strategies and hands back a lazy
//! byte stream, so large drive images are streamed into the store rather
//! than buffered wholesale:
//! - no scheme: local filesystem read
//! - git-style remote (`git@`, `git://`, `.git`): shallow clone, then read a
//!   named file out of the checkout
//! - anything else: plain HTTP GET
//!
//! No retry logic lives here; failures surface as `FetchFailed`.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use git2::{FetchOptions, build::RepoBuilder};
use tempfile::TempDir;

use crate::error::{PackwrightError, Result};
use crate::temp;

/// A classified retrieval strategy for a single uri
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Local path, either the content file itself or a directory holding it
    Disk(PathBuf),
    /// Generic HTTP(S) retrieval
    Http(String),
    /// Clone-and-read retrieval of a named file
    Git(String),
}

impl FetchStrategy {
    /// Classify a uri. Anything without a scheme is a local path.
    pub fn select(uri: &str) -> FetchStrategy {
        if is_git_uri(uri) {
            FetchStrategy::Git(uri.to_string())
        } else if uri.contains("://") {
            FetchStrategy::Http(uri.to_string())
        } else {
            FetchStrategy::Disk(PathBuf::from(uri))
        }
    }

    /// Open a lazy reader for `file_name` at this location.
    ///
    /// For disk sources pointing directly at a file, `file_name` is ignored;
    /// for directories and git checkouts it names the file to read.
    pub fn open(&self, file_name: &str) -> Result<Box<dyn Read>> {
        match self {
            FetchStrategy::Disk(path) => open_disk(path, file_name),
            FetchStrategy::Http(uri) => open_http(uri),
            FetchStrategy::Git(uri) => open_git(uri, file_name),
        }
    }

}

fn is_git_uri(uri: &str) -> bool {
    uri.starts_with("git@") || uri.starts_with("git://") || uri.ends_with(".git")
}

fn open_disk(path: &Path, file_name: &str) -> Result<Box<dyn Read>> {
    let target = if path.is_dir() {
        path.join(file_name)
    } else {
        path.to_path_buf()
    };
    let file = File::open(&target).map_err(|e| PackwrightError::FetchFailed {
        uri: target.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(Box::new(file))
}

fn open_http(uri: &str) -> Result<Box<dyn Read>> {
    let agent = ureq::Agent::new_with_defaults();
    let response = agent
        .get(uri)
        .header("User-Agent", concat!("packwright/", env!("CARGO_PKG_VERSION")))
        .call()
        .map_err(|e| PackwrightError::FetchFailed {
            uri: uri.to_string(),
            reason: match e {
                ureq::Error::StatusCode(code) => format!("HTTP {}", code),
                other => other.to_string(),
            },
        })?;
    Ok(Box::new(response.into_body().into_reader()))
}

/// Holds the temporary checkout alive for as long as the reader is open
struct GitFileReader {
    _checkout: TempDir,
    file: File,
}

impl Read for GitFileReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

fn open_git(uri: &str, file_name: &str) -> Result<Box<dyn Read>> {
    let checkout = temp::scratch_dir("packwright-clone-")?;

    let mut fetch_options = FetchOptions::new();
    fetch_options.depth(1);
    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);
    builder
        .clone(uri, checkout.path())
        .map_err(|e| PackwrightError::GitCloneFailed {
            url: uri.to_string(),
            reason: e.message().to_string(),
        })?;

    let target = checkout.path().join(file_name);
    let file = File::open(&target).map_err(|e| PackwrightError::FetchFailed {
        uri: format!("{}:{}", uri, file_name),
        reason: e.to_string(),
    })?;
    Ok(Box::new(GitFileReader {
        _checkout: checkout,
        file,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_select_classifies_local_paths() {
        assert_eq!(
            FetchStrategy::select("/var/bundles"),
            FetchStrategy::Disk(PathBuf::from("/var/bundles"))
        );
        assert_eq!(
            FetchStrategy::select("./relative/dir"),
            FetchStrategy::Disk(PathBuf::from("./relative/dir"))
        );
    }

    #[test]
    fn test_select_classifies_git_remotes() {
        assert!(matches!(
            FetchStrategy::select("git@github.com:org/bundles.git"),
            FetchStrategy::Git(_)
        ));
        assert!(matches!(
            FetchStrategy::select("https://github.com/org/bundles.git"),
            FetchStrategy::Git(_)
        ));
        assert!(matches!(
            FetchStrategy::select("git://host/bundles"),
            FetchStrategy::Git(_)
        ));
    }

    #[test]
    fn test_select_falls_back_to_http() {
        assert!(matches!(
            FetchStrategy::select("https://example.com/bundles/data.ext2"),
            FetchStrategy::Http(_)
        ));
    }

    #[test]
    fn test_open_disk_file_directly() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("data.ext2");
        std::fs::write(&file, b"contents").unwrap();

        let strategy = FetchStrategy::select(file.to_str().unwrap());
        let mut reader = strategy.open("ignored").unwrap();
        let mut buf = String::new();
        reader.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "contents");
    }

    #[test]
    fn test_open_disk_directory_joins_file_name() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("bundles.json"), b"{}").unwrap();

        let strategy = FetchStrategy::select(temp.path().to_str().unwrap());
        let mut reader = strategy.open("bundles.json").unwrap();
        let mut buf = String::new();
        reader.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "{}");
    }

    #[test]
    fn test_open_disk_missing_is_fetch_failed() {
        let strategy = FetchStrategy::select("/nonexistent/bundle.ext2");
        let err = strategy.open("bundle.ext2").map(|_| ()).unwrap_err();
        assert!(matches!(err, PackwrightError::FetchFailed { .. }));
    }
}
