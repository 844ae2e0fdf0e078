//! Manage package listing repos

use console::style;

use crate::cli::RepoCommand;
use crate::config::Config;
use crate::error::Result;

pub fn run(config: &mut Config, cmd: &RepoCommand) -> Result<()> {
    match cmd {
        RepoCommand::Add { source } => {
            config.repo_add(source)?;
            println!("{} {}", style("repo added:").green().bold(), source);
            Ok(())
        }
        RepoCommand::Update { source } => {
            let failures = config.repo_update(source.as_deref())?;
            for (source, error) in &failures {
                eprintln!(
                    "{} {}: {}",
                    style("update failed:").red().bold(),
                    source,
                    error
                );
            }
            let updated = match source {
                Some(_) => 1 - failures.len(),
                None => config.repo_sources().len() - failures.len(),
            };
            println!("{} {} repo(s)", style("updated:").green().bold(), updated);
            Ok(())
        }
        RepoCommand::Rm { source } => {
            config.repo_rm(source)?;
            println!("{} {}", style("repo removed:").green().bold(), source);
            Ok(())
        }
    }
}
