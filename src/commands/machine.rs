//! Compose and build stored machines
//!
//! `init` writes the descriptor template, `add` merges picked bundles into
//! drive roles, `build` runs the containerized build, and `install`
//! reconstructs a whole machine from a remote descriptor.

use std::io::Read;

use console::style;

use crate::bundle::BundleKind;
use crate::cli::{MachineAddCommand, MachineCommand};
use crate::commands::install::install_bundle;
use crate::config::Config;
use crate::error::{PackwrightError, Result};
use crate::fetcher::FetchStrategy;
use crate::machine::package::{DESCRIPTOR_FILE, EntryOptions, MachinePackage, parse_hex};
use crate::machine::{DockerExecutor, build_machine};
use crate::picker::{Chooser, pick_bundle, render_bundle};

pub fn run(config: &mut Config, cmd: &MachineCommand, chooser: &dyn Chooser) -> Result<()> {
    match cmd {
        MachineCommand::Init => init(config),
        MachineCommand::Add(add) => self::add(config, add, chooser),
        MachineCommand::Build => build(config),
        MachineCommand::Install { uri, nobuild } => install(config, uri, *nobuild),
    }
}

fn init(config: &Config) -> Result<()> {
    MachinePackage::template().save(config.project())?;
    println!(
        "{} {}",
        style("initialized:").green().bold(),
        config.project().join(DESCRIPTOR_FILE).display()
    );
    Ok(())
}

fn add(config: &mut Config, cmd: &MachineAddCommand, chooser: &dyn Chooser) -> Result<()> {
    let (name, kind, options) = match cmd {
        MachineAddCommand::Ram {
            bundle,
            length,
            resolvedpath,
        } => {
            parse_hex(length)?;
            (
                bundle,
                BundleKind::Ram,
                EntryOptions {
                    length: Some(length.clone()),
                    resolved_path: resolvedpath.clone(),
                    ..EntryOptions::default()
                },
            )
        }
        MachineAddCommand::Flash {
            bundle,
            length,
            start,
            shared,
            resolvedpath,
        } => {
            parse_hex(length)?;
            parse_hex(start)?;
            (
                bundle,
                BundleKind::Flashdrive,
                EntryOptions {
                    length: Some(length.clone()),
                    start: Some(start.clone()),
                    shared: *shared,
                    resolved_path: resolvedpath.clone(),
                    ..EntryOptions::default()
                },
            )
        }
        MachineAddCommand::Rom {
            bundle,
            bootargs,
            resolvedpath,
        } => (
            bundle,
            BundleKind::Rom,
            EntryOptions {
                bootargs: bootargs.clone(),
                resolved_path: resolvedpath.clone(),
                ..EntryOptions::default()
            },
        ),
    };

    let candidates = config.local_candidates(name);
    if candidates.is_empty() {
        return Err(PackwrightError::UnknownBundle {
            name: name.clone(),
        });
    }
    let bundle = pick_bundle(
        "Select the bundle to add",
        &candidates,
        render_bundle,
        chooser,
    )?;

    let mut pkg = MachinePackage::load(config.project())?;
    pkg.update_entry(&bundle, kind, options)?;
    pkg.save(config.project())?;
    println!(
        "{} {} as {}",
        style("added:").green().bold(),
        bundle.name,
        kind
    );
    Ok(())
}

fn build(config: &Config) -> Result<()> {
    let pkg = MachinePackage::load(config.project())?;
    let executor = DockerExecutor::from_env();
    let target = build_machine(config, &pkg, &executor)?;
    println!(
        "{} {}",
        style("machine stored:").green().bold(),
        target.display()
    );
    println!("{}", style(run_hint(&target)).dim());
    Ok(())
}

/// Copy-pasteable command to boot the freshly stored machine
fn run_hint(target: &std::path::Path) -> String {
    format!("run it with: cartesi-machine --load={}", target.display())
}

/// Fetch a descriptor, install every asset it references, then build.
///
/// Assets install in descriptor order; the first failure aborts the
/// remaining ones and the build. Assets installed before the failure
/// stay registered.
fn install(config: &mut Config, uri: &str, nobuild: bool) -> Result<()> {
    let strategy = FetchStrategy::select(uri);
    let mut reader = strategy.open(DESCRIPTOR_FILE)?;
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| PackwrightError::FetchFailed {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
    let pkg = MachinePackage::from_json(&text)?;
    pkg.save(config.project())?;

    for asset in &pkg.assets {
        if asset.options.resolved_path.is_some() {
            continue;
        }
        let bundle =
            config
                .global_by_id(&asset.cid)
                .ok_or_else(|| PackwrightError::UnresolvableAsset {
                    cid: asset.cid.to_string(),
                    name: asset.name.clone(),
                })?;
        install_bundle(config, &bundle)?;
        println!("{} {}", style("installed:").green().bold(), asset.name);
    }

    if nobuild {
        println!("{}", style("skipping build (--nobuild)").dim());
        return Ok(());
    }
    build(config)
}
