//! Repo source registry
//!
//! A repo source is a uri (local path, HTTP, or git) serving a
//! `bundles.json` listing. Registered sources live in `repos.json` under
//! the packwright home; each source's fetched listing is cached under
//! `repos/<slug>.json` and merged into global lookups.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PackwrightError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSource {
    pub uri: String,
}

/// Filesystem-safe cache name for a source uri
pub fn slug(uri: &str) -> String {
    let slug: String = uri
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '-' })
        .collect();
    slug.trim_matches('-').to_string()
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RepoSet {
    #[serde(default)]
    sources: Vec<RepoSource>,
}

impl RepoSet {
    pub fn sources(&self) -> &[RepoSource] {
        &self.sources
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.sources.iter().any(|s| s.uri == uri)
    }

    /// Register a source; returns false if already present
    pub fn add(&mut self, uri: String) -> bool {
        if self.contains(&uri) {
            return false;
        }
        self.sources.push(RepoSource { uri });
        true
    }

    /// Unregister a source; returns false if it was never registered
    pub fn remove(&mut self, uri: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.uri != uri);
        self.sources.len() != before
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|e| PackwrightError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| PackwrightError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| PackwrightError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
