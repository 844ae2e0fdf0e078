//! BLAKE3 content identifiers for bundle integrity
//!
//! Every bundle is addressed by the hash of its content, rendered as
//! `blake3:<64 hex digits>`. The store directory layout and the short
//! descriptors shown to the operator both carry this form.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{PackwrightError, Result};

/// Prefix identifying the hash algorithm in rendered identifiers
pub const CID_PREFIX: &str = "blake3:";

/// A validated content identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Hash a reader to completion, returning the identifier and byte count
    pub fn from_reader<R: Read>(mut reader: R) -> Result<(Self, u64)> {
        let mut hasher = Hasher::new();
        let mut buffer = [0u8; 8192];
        let mut total = 0u64;

        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
            total += n as u64;
        }

        Ok((ContentId(hasher.finalize().to_hex().to_string()), total))
    }

    /// Hash a file's contents
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PackwrightError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let (cid, _) = Self::from_reader(BufReader::new(file))?;
        Ok(cid)
    }

    /// The bare hex digest, without the algorithm prefix.
    /// Used for store directory names, where a `:` would be awkward.
    pub fn hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CID_PREFIX, self.0)
    }
}

impl FromStr for ContentId {
    type Err = PackwrightError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix(CID_PREFIX).unwrap_or(s);
        let valid = hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit());
        if !valid {
            return Err(PackwrightError::InvalidContentId {
                input: s.to_string(),
            });
        }
        Ok(ContentId(hex.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for ContentId {
    type Error = PackwrightError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ContentId> for String {
    fn from(cid: ContentId) -> Self {
        cid.to_string()
    }
}
