//! Publish a bundle to permanent storage
//!
//! The bundle is picked from the project-local listing, uploaded through a
//! storage provider, and only then registered in the global listing under
//! its public location. A failed upload registers nothing.

use std::path::{Path, PathBuf};

use console::style;

use crate::bundle::{Bundle, short_desc};
use crate::cli::PublishCommand;
use crate::config::Config;
use crate::error::{PackwrightError, Result};
use crate::picker::{Chooser, pick_bundle, render_bundle};
use crate::provider::{DiskProvider, S3Provider, StorageProvider};

pub fn run(config: &mut Config, cmd: &PublishCommand, chooser: &dyn Chooser) -> Result<()> {
    let name = match cmd {
        PublishCommand::S3 { name, .. }
        | PublishCommand::Disk { name, .. }
        | PublishCommand::Uri { name, .. } => name,
    };

    let candidates = config.local_candidates(name);
    if candidates.is_empty() {
        return Err(PackwrightError::UnknownBundle {
            name: name.clone(),
        });
    }
    let bundle = pick_bundle(
        "Select the bundle to publish",
        &candidates,
        render_bundle,
        chooser,
    )?;

    match cmd {
        PublishCommand::Uri { uri, .. } => register(config, &bundle, uri.clone()),
        PublishCommand::S3 {
            uri,
            bucket,
            nosave,
            ..
        } => {
            if !*nosave {
                upload(config, &bundle, &S3Provider::new(bucket.clone()))?;
            }
            register(config, &bundle, uri.clone())
        }
        PublishCommand::Disk { path, nosave, .. } => {
            let root = canonical_target(path)?;
            let uri = if *nosave {
                root.join(bundle.id.hex())
                    .join(&bundle.file_name)
                    .display()
                    .to_string()
            } else {
                upload(config, &bundle, &DiskProvider::new(root))?
            };
            register(config, &bundle, uri)
        }
    }
}

fn canonical_target(path: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(path)?;
    dunce::canonicalize(path).map_err(|e| PackwrightError::PublishFailed {
        target: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn upload(config: &Config, bundle: &Bundle, provider: &dyn StorageProvider) -> Result<String> {
    let content =
        config
            .store()
            .find(&bundle.id)
            .ok_or_else(|| PackwrightError::UnresolvableAsset {
                cid: bundle.id.to_string(),
                name: bundle.name.clone(),
            })?;
    let location = provider.store(&bundle.id, &bundle.file_name, &content)?;
    println!(
        "{} {} {}",
        style("uploaded:").green().bold(),
        style(provider.name()).cyan(),
        location
    );
    Ok(location)
}

fn register(config: &mut Config, bundle: &Bundle, uri: String) -> Result<()> {
    let record = bundle.with_uri(uri);
    println!(
        "{} {} at {}",
        style("published:").green().bold(),
        short_desc(&record),
        record.uri.as_deref().unwrap_or_default()
    );
    config.add_global(record)
}
