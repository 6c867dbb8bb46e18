//! `install` subcommand: resolve layers and run an install session.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::{Config, LAYERS_FILE};
use crate::logging::Logger;
use crate::overlay::InstallSession;
use crate::platform::Platform;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the root, the base layer or the destination cannot
/// be resolved, if `conf/layers.toml` is invalid, or if the session fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Logger) -> Result<()> {
    let platform = Platform::detect();
    let root = resolve_root(global)?;

    log.info(&format!("dotfiles {}", env!("CARGO_PKG_VERSION")));

    log.stage("Resolving layers");
    let config = Config::load(&root, &platform).with_context(|| format!("loading {LAYERS_FILE}"))?;
    log.info(&format!("platform: {}", platform.os));
    log.info(&format!("base: {}", config.base.display()));
    for overlay in &config.overlays {
        log.debug(&format!("overlay: {}", overlay.display()));
    }
    log.info(&format!("{} overlay layer(s)", config.overlays.len()));
    if !config.base.is_dir() {
        anyhow::bail!("base layer does not exist: {}", config.base.display());
    }

    let destination = match &opts.directory {
        Some(dir) => dir.clone(),
        None => home_dir()?,
    };
    if !destination.is_dir() {
        anyhow::bail!("destination is not a directory: {}", destination.display());
    }

    let result = InstallSession::new(&config.base, &destination, log)
        .overlays(&config.overlays)
        .work_dir(&root)
        .backup_dir(opts.backup_dir.clone())
        .mapper(config.mapper())
        .dry_run(opts.dry_run)
        .run();

    log.print_summary();

    let report = result.context("install failed")?;
    log.info(&format!(
        "{} file(s) processed into {}",
        report.stats.processed(),
        destination.display()
    ));
    Ok(())
}

/// Resolve the dotfiles root directory from CLI arguments or auto-detection.
///
/// # Errors
///
/// Returns an error if the root directory cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }

    if let Ok(root) = std::env::var("DOTFILES_ROOT") {
        return Ok(PathBuf::from(root));
    }

    // Binary inside the repository: target/<profile>/ or bin/
    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [parent.join("../.."), parent.join("..")];
        for candidate in &candidates {
            if is_repo_root(candidate) {
                return Ok(std::fs::canonicalize(candidate)?);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    if is_repo_root(&cwd) {
        return Ok(cwd);
    }

    anyhow::bail!("cannot determine dotfiles root. Use --root or set DOTFILES_ROOT env var");
}

/// Return `true` if `dir` looks like a dotfiles repository.
#[must_use]
pub fn is_repo_root(dir: &Path) -> bool {
    dir.join(LAYERS_FILE).is_file() || dir.join("common").is_dir()
}

/// Default destination: the user's home directory.
///
/// # Errors
///
/// Returns an error if `HOME` (or `USERPROFILE` on Windows) is not set.
pub fn home_dir() -> Result<PathBuf> {
    let home = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE")
            .or_else(|_| std::env::var("HOME"))
            .map_err(|_| anyhow::anyhow!("neither USERPROFILE nor HOME environment variable is set"))?
    } else {
        std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?
    };
    Ok(PathBuf::from(home))
}
