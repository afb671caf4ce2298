//! Reelscout CLI - Command-line interface
//!
//! Search a movie/series catalog from the terminal.

mod commands;
mod repl;

use std::path::PathBuf;

use clap::Parser;
use reelscout_core::RuntimeMode;
use reelscout_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "reelscout")]
#[command(about = "Search movies and series by title, type and year")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: CliLogLevel,

    /// Directory for the full trace log
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    /// Runtime mode (production or development)
    #[arg(long, default_value = "production", global = true)]
    mode: RuntimeMode,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    commands::handle_command(cli.command, cli.mode).await
}
