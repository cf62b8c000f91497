//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod queue;
mod session;

pub use queue::QueueCommands;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and service the loaded queue
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
    /// Run a service-session script against the loaded queue
    Session {
        /// Script with one command per line (current, next, loyal, priority, ...)
        script: PathBuf,
    },
}

/// Handle a CLI command
///
/// Loads the configured queue and routes the command to its handler.
pub fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let queue = config.load_queue()?;

    match command {
        Commands::Queue { command } => queue::handle_queue_command(command, queue),
        Commands::Session { script } => session::handle_session_command(&script, queue),
    }
}
