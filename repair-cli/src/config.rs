//! Configuration module
//!
//! Handles CLI configuration: which batch file to load and how to decode it.

use anyhow::{Context, Result};
use clap::ValueEnum;
use repair_core::{RecordFormat, RepairQueue};
use std::path::PathBuf;
use tracing::debug;

/// Record format selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Pick from the file extension (`.json` is JSON, anything else text)
    Auto,
    Text,
    Json,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the day's batch of repair requests
    pub file: PathBuf,

    /// How to decode the batch
    pub format: FormatArg,
}

impl Config {
    /// Resolves `auto` against the configured file
    pub fn record_format(&self) -> RecordFormat {
        match self.format {
            FormatArg::Auto => RecordFormat::from_path(&self.file),
            FormatArg::Text => RecordFormat::Text,
            FormatArg::Json => RecordFormat::Json,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.file.as_os_str().is_empty() {
            anyhow::bail!("file cannot be empty");
        }

        if self.file.is_dir() {
            anyhow::bail!("file {} is a directory", self.file.display());
        }

        Ok(())
    }

    /// Loads the configured batch into a fresh queue
    pub fn load_queue(&self) -> Result<RepairQueue> {
        let format = self.record_format();
        debug!(file = %self.file.display(), ?format, "loading repair queue");

        let mut queue = RepairQueue::new();
        queue
            .load_from_path(&self.file, format)
            .with_context(|| format!("Failed to load repairs from {}", self.file.display()))?;
        Ok(queue)
    }
}
