//! Machine package descriptor
//!
//! `machine-package.json` at the project root describes the assets a
//! stored machine is composed from, keyed by drive role. `machine init`
//! writes the template (destructively), `machine add` merges entries, and
//! `machine build` / `machine install` consume it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bundle::{Bundle, BundleKind};
use crate::content::ContentId;
use crate::error::{PackwrightError, Result};

/// Fixed project-relative descriptor path
pub const DESCRIPTOR_FILE: &str = "machine-package.json";

/// Drive options attached to a machine entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryOptions {
    /// Drive length, hex (e.g. 0x100000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    /// Drive start offset, hex (e.g. 0x8000000000000000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Kernel boot arguments (rom entries)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootargs: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shared: bool,
    /// Content path override, bypassing store resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<String>,
}

/// One asset occupying a drive role in the machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntry {
    pub cid: ContentId,
    pub name: String,
    pub kind: BundleKind,
    #[serde(flatten)]
    pub options: EntryOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachinePackage {
    pub version: u32,
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
}

impl MachinePackage {
    /// The template `machine init` writes: no assets until `machine add`
    pub fn template() -> Self {
        Self {
            version: 1,
            assets: Vec::new(),
        }
    }

    pub fn load(project: &Path) -> Result<Self> {
        let path = project.join(DESCRIPTOR_FILE);
        if !path.exists() {
            return Err(PackwrightError::DescriptorMissing {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(&path).map_err(|e| PackwrightError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| PackwrightError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write the descriptor, overwriting any existing file
    pub fn save(&self, project: &Path) -> Result<()> {
        let path = project.join(DESCRIPTOR_FILE);
        let text = serde_json::to_string_pretty(self)?;
        fs::write(&path, text).map_err(|e| PackwrightError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Merge an entry for `bundle` into the role given by `kind`.
    ///
    /// ram and rom are single-slot: a new entry replaces the old one.
    /// flashdrive entries are keyed by identity (same cid or name updates
    /// in place); distinct drives must occupy disjoint address ranges.
    pub fn update_entry(
        &mut self,
        bundle: &Bundle,
        kind: BundleKind,
        options: EntryOptions,
    ) -> Result<()> {
        let entry = AssetEntry {
            cid: bundle.id.clone(),
            name: bundle.name.clone(),
            kind,
            options,
        };

        match kind {
            BundleKind::Ram | BundleKind::Rom => {
                match self.assets.iter_mut().find(|a| a.kind == kind) {
                    Some(existing) => *existing = entry,
                    None => self.assets.push(entry),
                }
                Ok(())
            }
            BundleKind::Flashdrive => self.merge_flash(entry),
            BundleKind::Raw => Err(PackwrightError::UnsupportedDriveKind {
                kind: kind.to_string(),
            }),
        }
    }

    fn merge_flash(&mut self, entry: AssetEntry) -> Result<()> {
        let same_identity = |a: &AssetEntry| {
            a.kind == BundleKind::Flashdrive && (a.cid == entry.cid || a.name == entry.name)
        };
        let replace_at = self.assets.iter().position(same_identity);

        let new_range = address_range(&entry)?;
        for (i, other) in self.assets.iter().enumerate() {
            if other.kind != BundleKind::Flashdrive || Some(i) == replace_at {
                continue;
            }
            if let (Some(a), Some(b)) = (new_range, address_range(other)?) {
                if a.0 < b.1 && b.0 < a.1 {
                    return Err(PackwrightError::DriveOverlap {
                        name: entry.name,
                        other: other.name.clone(),
                    });
                }
            }
        }

        match replace_at {
            Some(i) => self.assets[i] = entry,
            None => self.assets.push(entry),
        }
        Ok(())
    }
}

/// Parse a `0x…` hex offset
pub fn parse_hex(value: &str) -> Result<u128> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| PackwrightError::InvalidHexValue {
            value: value.to_string(),
        })?;
    u128::from_str_radix(digits, 16).map_err(|_| PackwrightError::InvalidHexValue {
        value: value.to_string(),
    })
}

/// The half-open address range an entry occupies, if it has geometry
fn address_range(entry: &AssetEntry) -> Result<Option<(u128, u128)>> {
    match (&entry.options.start, &entry.options.length) {
        (Some(start), Some(length)) => {
            let start = parse_hex(start)?;
            let length = parse_hex(length)?;
            Ok(Some((start, start.saturating_add(length))))
        }
        _ => Ok(None),
    }
}
