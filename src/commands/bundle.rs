//! Package a local file into a content-addressed bundle

use console::style;

use crate::bundle::{Bundle, short_desc};
use crate::cli::BundleArgs;
use crate::config::Config;
use crate::error::{PackwrightError, Result};

pub fn run(config: &mut Config, args: &BundleArgs) -> Result<()> {
    let file = dunce::canonicalize(&args.file).map_err(|e| PackwrightError::FileReadFailed {
        path: args.file.display().to_string(),
        reason: e.to_string(),
    })?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PackwrightError::FileReadFailed {
            path: args.file.display().to_string(),
            reason: "not a file".to_string(),
        })?;

    let (cid, stored) = config.store().import_file(&file, &file_name)?;
    let record = Bundle {
        id: cid,
        name: args.name.clone(),
        version: args.version.clone(),
        kind: args.kind,
        file_name,
        desc: args.desc.clone(),
        uri: Some("local".to_string()),
        path: Some(stored.display().to_string()),
    };

    println!("{} {}", style("bundled:").green().bold(), short_desc(&record));
    config.add_local(record)
}
