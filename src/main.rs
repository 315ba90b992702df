// Main entry point for resultsink

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::info;

use resultsink::cli::{Cli, Commands};
use resultsink::commands;
use resultsink::config::Config;
use resultsink::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting resultsink v{}", env!("CARGO_PKG_VERSION"));
    }

    if let Some(shell) = cli.completion {
        return commands::handle_completion(shell);
    }

    let config_file = cli.config_file.clone().or_else(Config::discover);

    match &cli.command {
        Some(Commands::Publish(args)) => {
            let config = commands::resolve_config(cli.config_file.as_deref())?;
            commands::handle_publish(args, config).await?;
        }
        Some(Commands::Config) => {
            let config = commands::resolve_config(cli.config_file.as_deref())?;
            commands::handle_show_config(&config, config_file.as_deref())?;
        }
        Some(Commands::InitConfig(args)) => commands::handle_init_config(args)?,
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
