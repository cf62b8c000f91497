//! Repair Queue CLI
//!
//! Command-line interface for working through a day's repair queue.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::{Config, FormatArg};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repair-queue")]
#[command(about = "Daily repair queue for a vehicle service shop", long_about = None)]
struct Cli {
    /// Batch of repair requests to load
    #[arg(short, long, env = "REPAIR_QUEUE_FILE", default_value = "repairs.txt")]
    file: PathBuf,

    /// Record format of the batch
    #[arg(long, env = "REPAIR_QUEUE_FORMAT", value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Logs go to stderr, command output to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repair_cli=info,repair_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        file: cli.file,
        format: cli.format,
    };
    config.validate()?;

    handle_command(cli.command, &config)
}
