//! Stored-machine build orchestration
//!
//! Stages every asset's content into a fresh temporary work directory,
//! writes the generated machine configuration and the fixed run script
//! beside them, invokes the containerized build synchronously, and
//! relocates the produced output into the project. The work directory is
//! released on every exit path.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use walkdir::WalkDir;

use crate::bundle::BundleKind;
use crate::config::Config;
use crate::error::{PackwrightError, Result};
use crate::machine::luacfg::{
    FlashConfig, MachineConfig, RamConfig, RomConfig, generate_lua_config,
};
use crate::machine::package::{AssetEntry, MachinePackage};
use crate::temp;

/// Fixed output location, relative to the project directory
pub const OUTPUT_DIR: &str = "stored-machine";

/// Run script written next to the generated configuration
const RUN_CONFIG_LUA: &str = include_str!("../../scripts/run-config.lua");

/// Mount point of the package directory inside the build container
const CONTAINER_PACKAGE_DIR: &str = "/opt/packwright/packages";

/// Containerized build invocation, behind a seam so the orchestration is
/// testable without a container runtime
pub trait BuildExecutor {
    /// Run the build with `workdir` as the package directory. A non-empty
    /// diagnostic stream means failure.
    fn build(&self, workdir: &Path) -> Result<()>;
}

/// Drives `docker run` against the emulator playground image
pub struct DockerExecutor {
    program: String,
    image: String,
}

impl DockerExecutor {
    /// Program and image come from PACKWRIGHT_DOCKER / PACKWRIGHT_BUILD_IMAGE
    /// when set, so alternate runtimes (podman) and images can be substituted.
    pub fn from_env() -> Self {
        Self {
            program: std::env::var("PACKWRIGHT_DOCKER").unwrap_or_else(|_| "docker".to_string()),
            image: std::env::var("PACKWRIGHT_BUILD_IMAGE")
                .unwrap_or_else(|_| "cartesi/playground:0.1.1".to_string()),
        }
    }
}

impl BuildExecutor for DockerExecutor {
    fn build(&self, workdir: &Path) -> Result<()> {
        let mut args: Vec<String> = vec!["run".to_string()];
        for (key, value) in user_env() {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push("-v".to_string());
        args.push(format!("{}:{}", workdir.display(), CONTAINER_PACKAGE_DIR));
        args.push(self.image.clone());
        args.push("/bin/bash".to_string());
        args.push("-c".to_string());
        args.push(format!(
            "cd {CONTAINER_PACKAGE_DIR} && lua5.3 run-config.lua machine-config && echo 'machine built'"
        ));

        println!("{} {}", self.program, args.join(" "));
        let output = Command::new(&self.program).args(&args).output().map_err(|e| {
            PackwrightError::BuildFailed {
                diagnostics: format!("could not invoke {}: {}", self.program, e),
            }
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || !stderr.trim().is_empty() {
            return Err(PackwrightError::BuildFailed {
                diagnostics: stderr.into_owned(),
            });
        }
        print!("{}", String::from_utf8_lossy(&output.stdout));
        Ok(())
    }
}

/// Host identity passed into the container so output artifacts are not
/// root-owned. Missing pieces are omitted rather than fatal.
fn user_env() -> Vec<(String, String)> {
    let mut env = Vec::new();
    if let Ok(user) = std::env::var("USER") {
        env.push(("USER".to_string(), user));
    }
    for (var, flag) in [("UID", "-u"), ("GID", "-g")] {
        if let Ok(output) = Command::new("id").arg(flag).output() {
            if output.status.success() {
                let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !id.is_empty() {
                    env.push((var.to_string(), id));
                }
            }
        }
    }
    env
}

/// Build a stored machine from the descriptor and move it to the fixed
/// output location, replacing any prior output
pub fn build_machine(
    config: &Config,
    pkg: &MachinePackage,
    executor: &dyn BuildExecutor,
) -> Result<PathBuf> {
    let work = temp::scratch_dir("packwright-build-")?;

    let machine_config = stage_assets(config, pkg, work.path())?;
    fs::write(
        work.path().join("machine-config.lua"),
        generate_lua_config(&machine_config, "return"),
    )?;
    fs::write(work.path().join("run-config.lua"), RUN_CONFIG_LUA)?;

    executor.build(work.path())?;

    let produced = work.path().join(OUTPUT_DIR);
    if !produced.is_dir() {
        return Err(PackwrightError::BuildFailed {
            diagnostics: "build completed without producing a stored machine".to_string(),
        });
    }
    let target = config.project().join(OUTPUT_DIR);
    relocate(&produced, &target)?;
    Ok(target)
    // work dir dropped here; cleanup happens on the error paths above too
}

/// Copy each asset's content into the work directory and slot it into the
/// machine configuration by drive role
fn stage_assets(config: &Config, pkg: &MachinePackage, workdir: &Path) -> Result<MachineConfig> {
    let mut machine = MachineConfig::default();

    for asset in &pkg.assets {
        let source = resolve_content(config, asset)?;
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| asset.name.clone());
        fs::copy(&source, workdir.join(&file_name)).map_err(|e| {
            PackwrightError::FileWriteFailed {
                path: workdir.join(&file_name).display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let geometry_missing = || PackwrightError::MissingDriveGeometry {
            name: asset.name.clone(),
        };
        match asset.kind {
            BundleKind::Ram => {
                machine.ram = Some(RamConfig {
                    length: asset.options.length.clone().ok_or_else(geometry_missing)?,
                    image_filename: file_name,
                });
            }
            BundleKind::Rom => {
                machine.rom = Some(RomConfig {
                    bootargs: asset.options.bootargs.clone(),
                    image_filename: file_name,
                });
            }
            BundleKind::Flashdrive => {
                machine.flash_drives.push(FlashConfig {
                    start: asset.options.start.clone().ok_or_else(geometry_missing)?,
                    length: asset.options.length.clone().ok_or_else(geometry_missing)?,
                    shared: asset.options.shared,
                    image_filename: file_name,
                });
            }
            BundleKind::Raw => {
                return Err(PackwrightError::UnsupportedDriveKind {
                    kind: asset.kind.to_string(),
                });
            }
        }
    }
    Ok(machine)
}

fn resolve_content(config: &Config, asset: &AssetEntry) -> Result<PathBuf> {
    if let Some(resolved) = &asset.options.resolved_path {
        return Ok(PathBuf::from(resolved));
    }
    config
        .store()
        .find(&asset.cid)
        .ok_or_else(|| PackwrightError::UnresolvableAsset {
            cid: asset.cid.to_string(),
            name: asset.name.clone(),
        })
}

/// Move `src` to `dst`, replacing any prior output. Falls back to a
/// recursive copy when the temp dir and the project sit on different
/// filesystems.
fn relocate(src: &Path, dst: &Path) -> Result<()> {
    if dst.exists() {
        fs::remove_dir_all(dst)?;
    }
    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| PackwrightError::IoError {
            message: e.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| PackwrightError::IoError {
                message: e.to_string(),
            })?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    fs::remove_dir_all(src)?;
    Ok(())
}
