//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the layered dotfiles installer.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Layered dotfiles installer: stage common and platform layers, then install",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Override dotfiles root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stage every layer and install the result into the destination
    Install(InstallOpts),
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Destination directory (defaults to the home directory)
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep backups in this directory instead of a fresh one per run
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn install_opts(args: &[&str]) -> InstallOpts {
        match Cli::parse_from(args.iter().copied()).command {
            Command::Install(opts) => opts,
            Command::Version => panic!("expected install"),
        }
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_defaults() {
        let opts = install_opts(&["dotfiles", "install"]);
        assert_eq!(opts.directory, None);
        assert!(!opts.dry_run);
        assert_eq!(opts.backup_dir, None);
    }

    #[test]
    fn parse_install_directory_short() {
        let opts = install_opts(&["dotfiles", "install", "-d", "/tmp/home"]);
        assert_eq!(opts.directory, Some(PathBuf::from("/tmp/home")));
    }

    #[test]
    fn parse_install_dry_run() {
        assert!(install_opts(&["dotfiles", "install", "--dry-run"]).dry_run);
        assert!(install_opts(&["dotfiles", "install", "-n"]).dry_run);
    }

    #[test]
    fn parse_install_backup_dir() {
        let opts = install_opts(&["dotfiles", "install", "--backup-dir", "/tmp/bak"]);
        assert_eq!(opts.backup_dir, Some(PathBuf::from("/tmp/bak")));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["dotfiles", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["dotfiles", "-v", "install"]);
        assert!(cli.verbose);
        let cli = Cli::parse_from(["dotfiles", "install", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_root_override() {
        let cli = Cli::parse_from(["dotfiles", "--root", "/tmp/dotfiles", "install"]);
        assert_eq!(cli.global.root, Some(PathBuf::from("/tmp/dotfiles")));
    }
}
