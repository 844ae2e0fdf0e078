//! Publish storage providers
//!
//! A provider copies a bundle's stored content to a target backend and
//! reports the location it can later be fetched from. Providers are small
//! strategy values injected into the publish orchestrator; the orchestrator
//! never constructs one inline.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::content::ContentId;
use crate::error::{PackwrightError, Result};

pub trait StorageProvider {
    /// Human-readable backend name for messages
    fn name(&self) -> &str;

    /// Copy `content` to the backend under `<cid>/<file_name>`, returning
    /// the resulting location. Errors propagate un-retried.
    fn store(&self, cid: &ContentId, file_name: &str, content: &Path) -> Result<String>;
}

/// Copies content into a directory tree, mirroring the store layout
pub struct DiskProvider {
    root: PathBuf,
}

impl DiskProvider {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl StorageProvider for DiskProvider {
    fn name(&self) -> &str {
        "disk"
    }

    fn store(&self, cid: &ContentId, file_name: &str, content: &Path) -> Result<String> {
        let target_dir = self.root.join(cid.hex());
        fs::create_dir_all(&target_dir)?;
        let target = target_dir.join(file_name);
        fs::copy(content, &target).map_err(|e| PackwrightError::PublishFailed {
            target: target.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(target.display().to_string())
    }
}

/// Uploads content with the `aws` CLI, treated as an opaque subprocess
pub struct S3Provider {
    bucket: String,
}

impl S3Provider {
    pub fn new(bucket: String) -> Self {
        Self { bucket }
    }
}

impl StorageProvider for S3Provider {
    fn name(&self) -> &str {
        "s3"
    }

    fn store(&self, cid: &ContentId, file_name: &str, content: &Path) -> Result<String> {
        let location = format!("s3://{}/{}/{}", self.bucket, cid.hex(), file_name);
        let output = Command::new("aws")
            .args(["s3", "cp"])
            .arg(content)
            .arg(&location)
            .output()
            .map_err(|e| PackwrightError::PublishFailed {
                target: location.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(PackwrightError::PublishFailed {
                target: location,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(location)
    }
}
