//! Bundle records and their short human-readable descriptors
//!
//! A bundle is an immutable record pointing at content-addressed data.
//! Records are copied with field overrides as they move between listings,
//! never mutated in place.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::content::ContentId;
use crate::error::{PackwrightError, Result};

/// The drive role a bundle's content is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
    Ram,
    Rom,
    Flashdrive,
    Raw,
}

impl BundleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleKind::Ram => "ram",
            BundleKind::Rom => "rom",
            BundleKind::Flashdrive => "flashdrive",
            BundleKind::Raw => "raw",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ram" => Some(BundleKind::Ram),
            "rom" => Some(BundleKind::Rom),
            "flashdrive" => Some(BundleKind::Flashdrive),
            "raw" => Some(BundleKind::Raw),
            _ => None,
        }
    }
}

impl std::fmt::Display for BundleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable bundle record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Content identifier, derived from the bundle's bytes
    pub id: ContentId,
    pub name: String,
    pub version: String,
    #[serde(rename = "bundleType")]
    pub kind: BundleKind,
    /// File name the content is stored and staged under
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Where the content currently resides (remote uri, or "local" once installed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Resolved on-disk path, present once materialized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Bundle {
    /// Copy of this record marked as locally materialized at `path`
    pub fn as_local(&self, path: String) -> Bundle {
        Bundle {
            uri: Some("local".to_string()),
            path: Some(path),
            ..self.clone()
        }
    }

    /// Copy of this record pointing at a new public location
    pub fn with_uri(&self, uri: String) -> Bundle {
        Bundle {
            uri: Some(uri),
            ..self.clone()
        }
    }
}

/// Render the short descriptor shown to the operator during disambiguation.
/// The format round-trips through [`parse_short_desc`] to recover the id.
pub fn short_desc(bundle: &Bundle) -> String {
    format!(
        "{}:{}@{}#{}",
        bundle.kind, bundle.name, bundle.version, bundle.id
    )
}

/// Parse a short descriptor back into its components
pub fn parse_short_desc(desc: &str) -> Result<(BundleKind, String, String, ContentId)> {
    let invalid = || PackwrightError::InvalidDescriptor {
        input: desc.to_string(),
    };

    let (head, id) = desc.rsplit_once('#').ok_or_else(invalid)?;
    let (kind, rest) = head.split_once(':').ok_or_else(invalid)?;
    let (name, version) = rest.rsplit_once('@').ok_or_else(invalid)?;

    let kind = BundleKind::parse(kind).ok_or_else(invalid)?;
    let id = id.parse().map_err(|_| invalid())?;
    Ok((kind, name.to_string(), version.to_string(), id))
}

/// Fixture record for unit tests across the crate
#[cfg(test)]
pub(crate) fn test_bundle(name: &str, version: &str) -> Bundle {
    let (id, _) = ContentId::from_reader(format!("{name}@{version}").as_bytes()).unwrap();
    Bundle {
        id,
        name: name.to_string(),
        version: version.to_string(),
        kind: BundleKind::Flashdrive,
        file_name: format!("{name}.ext2"),
        desc: None,
        uri: Some(format!("https://example.com/{name}.ext2")),
        path: None,
    }
}
