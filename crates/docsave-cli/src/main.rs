//! docsave CLI - save documents without clobbering existing ones
//!
//! Provides commands for:
//! - Saving a document, resolving name collisions
//! - Suggesting a free variant of a name
//! - Listing saved documents
//! - Viewing and validating configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod prompt;
mod store;

use commands::{
    completions::CompletionsCommand, config::ConfigCommand, list::ListCommand,
    save::SaveCommand, suggest::SuggestCommand, AppContext,
};
use docsave_core::config::Config;
use output::OutputFormat;

/// Host used when neither --host nor DOCSAVE_HOST is set
const DEFAULT_HOST: &str = "localhost";

#[derive(Debug, Parser)]
#[command(
    name = "docsave",
    version,
    about = "Save documents without overwriting existing ones"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Host used to pick the storage environment
    #[arg(long, global = true, env = "DOCSAVE_HOST")]
    host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save a document under a name, resolving collisions
    Save(SaveCommand),
    /// Suggest a free variant of a name
    Suggest(SuggestCommand),
    /// List saved documents
    List(ListCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    // Setup tracing
    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = OutputFormat::from_flags(cli.json, cli.quiet);

    let host = cli.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string());
    debug!(host = %host, config_path = %config_path.display(), "Starting docsave");

    let ctx = AppContext {
        format,
        config,
        config_path,
        host,
    };

    match cli.command {
        Commands::Save(cmd) => cmd.execute(&ctx).await,
        Commands::Suggest(cmd) => cmd.execute(&ctx).await,
        Commands::List(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(&ctx).await,
    }
}
