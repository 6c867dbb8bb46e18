//! `dotfiles` binary: parse arguments, set up logging, dispatch.
use anyhow::Result;
use clap::Parser;

use dotfiles_overlay::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match args.command {
        cli::Command::Install(opts) => {
            logging::init_subscriber(args.verbose, "install");
            let log = logging::Logger::new("install");
            commands::install::run(&args.global, &opts, &log)
        }
        #[allow(clippy::print_stdout)]
        cli::Command::Version => {
            println!("dotfiles {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
