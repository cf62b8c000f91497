//! Queue command handlers
//!
//! Handles read-only views of the day's queue and a straight run through it.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use repair_core::{Repair, RepairQueue};
use serde::Serialize;
use tracing::info;

/// Queue subcommands
#[derive(Subcommand)]
pub enum QueueCommands {
    /// List every repair in service order
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show size, highest and total cost
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the vehicle at a 1-indexed position
    Vehicle {
        /// Position in the day's list, starting at 1
        position: usize,
    },
    /// Service every repair from first to last
    Serve,
}

/// Summary figures for the day
#[derive(Debug, Serialize)]
struct QueueStats {
    size: usize,
    max_cost: f64,
    total_cost: f64,
}

impl From<&RepairQueue> for QueueStats {
    fn from(queue: &RepairQueue) -> Self {
        Self {
            size: queue.len(),
            max_cost: queue.max_cost(),
            total_cost: queue.total_cost(),
        }
    }
}

/// Handle queue commands
pub fn handle_queue_command(command: QueueCommands, queue: RepairQueue) -> Result<()> {
    match command {
        QueueCommands::List { json } => list_repairs(&queue, json),
        QueueCommands::Stats { json } => show_stats(&queue, json),
        QueueCommands::Vehicle { position } => show_vehicle(&queue, position),
        QueueCommands::Serve => serve_all(queue),
    }
}

fn list_repairs(queue: &RepairQueue, json: bool) -> Result<()> {
    if json {
        let repairs: Vec<&Repair> = queue.iter().collect();
        println!("{}", serde_json::to_string_pretty(&repairs)?);
        return Ok(());
    }

    if queue.is_empty() {
        println!("{}", "No repairs scheduled.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} repair(s):", queue.len()).bold()
    );
    println!();
    for line in listing_lines(queue) {
        println!("{}", line);
    }

    Ok(())
}

/// Numbered listing in service order, one line per repair
fn listing_lines(queue: &RepairQueue) -> Vec<String> {
    queue
        .iter()
        .enumerate()
        .map(|(index, repair)| format!("  {:>3}. {}", index + 1, repair))
        .collect()
}

fn show_stats(queue: &RepairQueue, json: bool) -> Result<()> {
    let stats = QueueStats::from(queue);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Queue Stats:".bold());
    println!("  Repairs:    {}", stats.size.to_string().cyan());
    println!("  Max Cost:   {:.2}", stats.max_cost);
    println!("  Total Cost: {:.2}", stats.total_cost);

    Ok(())
}

fn show_vehicle(queue: &RepairQueue, position: usize) -> Result<()> {
    let vehicle = queue
        .vehicle_at(position)
        .context("Failed to look up vehicle")?;

    println!("{}", vehicle);

    Ok(())
}

fn serve_all(mut queue: RepairQueue) -> Result<()> {
    if queue.is_empty() {
        println!("{}", "No repairs scheduled.".yellow());
        return Ok(());
    }

    let total = queue.len();
    while let Some(repair) = queue.current() {
        let position = queue.position().unwrap_or_default();
        println!(
            "  {} Servicing {}/{}: {}",
            "▸".cyan(),
            position,
            total,
            repair
        );
        queue.advance();
    }

    info!(serviced = total, "finished servicing queue");
    println!();
    println!("{}", "✓ All repairs serviced".green());

    Ok(())
}
