//! Packwright - content bundle and machine package manager

mod bundle;
mod cli;
mod commands;
mod config;
mod content;
mod error;
mod fetcher;
mod machine;
mod picker;
mod provider;
mod store;
mod temp;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::Result;
use crate::picker::InteractiveChooser;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // a couple of commands need no configuration at all
    match &cli.command {
        Commands::Completions(args) => return commands::completions::run(args),
        Commands::Version => return commands::version::run(),
        _ => {}
    }

    let project = match cli.project {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let mut config = Config::load(project)?;
    let chooser = InteractiveChooser;

    match cli.command {
        Commands::Bundle(args) => commands::bundle::run(&mut config, &args),
        Commands::Fetch(args) => commands::fetch::run(&config, &args.name),
        Commands::Install(args) => commands::install::run(&mut config, &args.name, &chooser),
        Commands::Publish(cmd) => commands::publish::run(&mut config, &cmd, &chooser),
        Commands::Repo(cmd) => commands::repo::run(&mut config, &cmd),
        Commands::Machine(cmd) => commands::machine::run(&mut config, &cmd, &chooser),
        Commands::Completions(_) | Commands::Version => unreachable!(),
    }
}
