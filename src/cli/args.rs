// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Publish test results to an Elasticsearch-compatible index
#[derive(Parser, Debug)]
#[command(name = "resultsink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Best-effort publishing of test results", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Use this configuration file instead of the default locations
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completion: Option<Shell>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish completed test results from a JSON file
    Publish(PublishArgs),

    /// Show the effective configuration
    Config,

    /// Create default configuration file
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// JSON array or newline-delimited JSON of completed tests
    #[arg(required = true)]
    pub file: PathBuf,

    /// Number of records in flight at once
    #[arg(short = 'p', long, default_value_t = 8)]
    pub parallel: usize,

    /// Publish even if the configuration leaves publishing disabled
    #[arg(long, default_value_t = false)]
    pub enable: bool,

    /// Override the cluster URL
    #[arg(long)]
    pub url: Option<String>,

    /// Override the target index
    #[arg(long)]
    pub index: Option<String>,

    /// Exit non-zero when any record fails to publish
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InitConfigArgs {
    /// Where to write the file
    #[arg(default_value = ".resultsinkrc.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long, default_value_t = false)]
    pub force: bool,
}
