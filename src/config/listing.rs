//! Bundle listings: name → set of bundle records
//!
//! A listing maps a bundle name to every record sharing that name
//! (multiple versions or drive kinds). Within one listing a (name, id)
//! pair is unique; adding an existing pair overwrites the record.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bundle::Bundle;
use crate::content::ContentId;
use crate::error::{PackwrightError, Result};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    bundles: BTreeMap<String, Vec<Bundle>>,
}

impl Listing {
    /// All records sharing `name`
    pub fn get(&self, name: &str) -> &[Bundle] {
        self.bundles.get(name).map_or(&[], Vec::as_slice)
    }

    /// Look a record up by its content identifier
    pub fn get_by_id(&self, cid: &ContentId) -> Option<&Bundle> {
        self.bundles
            .values()
            .flat_map(|v| v.iter())
            .find(|b| &b.id == cid)
    }

    /// Insert a record, overwriting any existing (name, id) entry
    pub fn add(&mut self, bundle: Bundle) {
        let entries = self.bundles.entry(bundle.name.clone()).or_default();
        match entries.iter_mut().find(|b| b.id == bundle.id) {
            Some(existing) => *existing = bundle,
            None => entries.push(bundle),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Load a listing file; a missing file is an empty listing
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

    /// Parse a listing fetched from a repo source
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::test_bundle;
    use tempfile::TempDir;

    #[test]
    fn test_get_unknown_name_is_empty() {
        let listing = Listing::default();
        assert!(listing.get("missing").is_empty());
    }

    #[test]
    fn test_add_keeps_versions_separate() {
        let mut listing = Listing::default();
        listing.add(test_bundle("dapp-test-data", "1.0.0"));
        listing.add(test_bundle("dapp-test-data", "2.0.0"));
        assert_eq!(listing.get("dapp-test-data").len(), 2);
    }

    #[test]
    fn test_add_overwrites_same_name_and_id() {
        let mut listing = Listing::default();
        let bundle = test_bundle("dapp-test-data", "1.0.0");
        listing.add(bundle.clone());
        listing.add(bundle.with_uri("https://mirror.example.com/data.ext2".to_string()));

        let entries = listing.get("dapp-test-data");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].uri.as_deref(),
            Some("https://mirror.example.com/data.ext2")
        );
    }

    #[test]
    fn test_get_by_id() {
        let mut listing = Listing::default();
        let bundle = test_bundle("dapp-test-data", "1.0.0");
        listing.add(bundle.clone());
        assert_eq!(listing.get_by_id(&bundle.id), Some(&bundle));

        let other = test_bundle("other", "1.0.0");
        assert!(listing.get_by_id(&other.id).is_none());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let listing = Listing::load(&temp.path().join("bundles.json")).unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/bundles.json");

        let mut listing = Listing::default();
        listing.add(test_bundle("dapp-test-data", "1.0.0"));
        listing.save(&path).unwrap();

        let loaded = Listing::load(&path).unwrap();
        assert_eq!(loaded.get("dapp-test-data").len(), 1);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bundles.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Listing::load(&path).unwrap_err();
        assert!(matches!(err, PackwrightError::ConfigParseFailed { .. }));
    }
}
