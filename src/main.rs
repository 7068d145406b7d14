mod cli;
mod config;
mod logging;
mod poller;
mod snapshot;
mod source;
mod todo;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            source,
            no_auto_refresh,
            log_file,
        } => {
            cli::handle_watch(&source, no_auto_refresh, log_file)?;
        }
        Commands::Fetch { source, json } => {
            cli::handle_fetch(&source, json)?;
        }
    }

    Ok(())
}
