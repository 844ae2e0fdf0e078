//! Install a bundle into the current project
//!
//! Resolution goes name, candidate pick, content fetch, local registration.
//! Content already present in the store is not fetched again; the local
//! listing still gains a record so the project sees the bundle.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::bundle::{Bundle, short_desc};
use crate::config::Config;
use crate::error::{PackwrightError, Result};
use crate::fetcher::FetchStrategy;
use crate::picker::{Chooser, pick_bundle, render_bundle};

pub fn run(config: &mut Config, name: &str, chooser: &dyn Chooser) -> Result<()> {
    let candidates = config.global_candidates(name);
    if candidates.is_empty() {
        return Err(PackwrightError::UnknownBundle {
            name: name.to_string(),
        });
    }

    let bundle = pick_bundle(
        "Select the bundle to install",
        &candidates,
        render_bundle,
        chooser,
    )?;
    install_bundle(config, &bundle)?;
    println!("{} {}", style("installed:").green().bold(), short_desc(&bundle));
    Ok(())
}

/// Materialize one bundle's content and register it in the local listing.
/// Shared with `machine install`, which resolves assets by identifier.
pub fn install_bundle(config: &mut Config, bundle: &Bundle) -> Result<()> {
    let path = match config.store().find(&bundle.id) {
        Some(existing) => existing,
        None => {
            let uri = bundle
                .uri
                .as_deref()
                .ok_or_else(|| PackwrightError::MissingUri {
                    name: bundle.name.clone(),
                })?;
            let strategy = FetchStrategy::select(uri);

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message(format!("fetching {uri}"));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let reader = strategy.open(&bundle.file_name)?;
            let result = config
                .store()
                .materialize(&bundle.id, &bundle.file_name, reader);
            spinner.finish_and_clear();
            result?
        }
    };

    config.add_local(bundle.as_local(path.display().to_string()))
}
