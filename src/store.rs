//! Content-addressed bundle store
//!
//! Layout: `<root>/<cid hex>/<file name>`. Content is streamed into a
//! staging file while being hashed; only content whose digest matches the
//! expected identifier is promoted into the store, so a stale or tampered
//! listing can never poison the store.

use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use blake3::Hasher;
use tempfile::NamedTempFile;

use crate::content::ContentId;
use crate::error::{PackwrightError, Result};

pub struct BundleStore {
    root: PathBuf,
}

impl BundleStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Path the content would live at for a given file name
    pub fn path_of(&self, cid: &ContentId, file_name: &str) -> PathBuf {
        self.root.join(cid.hex()).join(file_name)
    }

    /// Locate stored content for an identifier, whatever its file name
    pub fn find(&self, cid: &ContentId) -> Option<PathBuf> {
        let dir = self.root.join(cid.hex());
        let entries = fs::read_dir(&dir).ok()?;
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .find(|p| p.is_file())
    }

    /// Stream content into the store, verifying it hashes to `expected`.
    ///
    /// The bytes land in a staging file first; on a digest mismatch the
    /// staging file is dropped and the store is left untouched.
    pub fn materialize<R: Read>(
        &self,
        expected: &ContentId,
        file_name: &str,
        mut reader: R,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let staging = NamedTempFile::new_in(&self.root)?;

        let mut hasher = Hasher::new();
        let mut writer = BufWriter::new(staging);
        let mut buffer = [0u8; 8192];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
            writer.write_all(&buffer[..n])?;
        }
        let staging = writer
            .into_inner()
            .map_err(|e| PackwrightError::IoError {
                message: e.to_string(),
            })?;

        let actual: ContentId = hasher.finalize().to_hex().to_string().parse()?;
        if &actual != expected {
            return Err(PackwrightError::ContentMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        let final_path = self.path_of(expected, file_name);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }
        staging
            .persist(&final_path)
            .map_err(|e| PackwrightError::FileWriteFailed {
                path: final_path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(final_path)
    }

    /// Copy a local file into the store, returning its identifier.
    /// Used by the bundling step, where the identifier is not yet known.
    pub fn import_file(&self, source: &Path, file_name: &str) -> Result<(ContentId, PathBuf)> {
        let cid = ContentId::from_file(source)?;
        if let Some(existing) = self.find(&cid) {
            return Ok((cid, existing));
        }
        let final_path = self.path_of(&cid, file_name);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &final_path).map_err(|e| PackwrightError::FileWriteFailed {
            path: final_path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok((cid, final_path))
    }
}
