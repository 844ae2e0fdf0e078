//! Scratch directories for git checkouts and build staging

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::error::Result;

/// Create a prefixed scratch directory, removed when the handle drops.
///
/// The parent is forced absolute: with a relative TMPDIR (e.g. `tmp`),
/// `env::temp_dir()` would resolve under the project directory the
/// command runs in, and build staging must never land there.
pub fn scratch_dir(prefix: &str) -> Result<TempDir> {
    Ok(tempfile::Builder::new().prefix(prefix).tempdir_in(base())?)
}

fn base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}
