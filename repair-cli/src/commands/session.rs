//! Service session scripts
//!
//! A session script replays a day at the counter against the loaded queue,
//! one command per line:
//!
//! ```text
//! # vehicle   cost
//! current
//! loyal    LOY001 55.00
//! priority PRI001 40.00
//! next
//! vehicle  2
//! max
//! ```
//!
//! Blank lines and `#` comments are ignored. Every command writes one
//! transcript line, except `list` which writes the whole queue.

use anyhow::{Context, Result, anyhow, bail};
use repair_core::{Placement, Repair, RepairQueue};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// One line of a session script
#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    Current,
    Next,
    Insert(Repair, Placement),
    Append(Repair),
    Vehicle(usize),
    MaxCost,
    Size,
    List,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (verb, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim();

        let no_args = |command: SessionCommand| {
            if rest.is_empty() {
                Ok(command)
            } else {
                Err(anyhow!("`{verb}` takes no arguments"))
            }
        };
        let repair = || {
            rest.parse::<Repair>()
                .with_context(|| format!("`{verb}` expects <vehicle> <cost>"))
        };

        match verb {
            "current" => no_args(Self::Current),
            "next" => no_args(Self::Next),
            "max" => no_args(Self::MaxCost),
            "size" => no_args(Self::Size),
            "list" => no_args(Self::List),
            "loyal" => Ok(Self::Insert(repair()?, Placement::AfterCursor)),
            "priority" => Ok(Self::Insert(repair()?, Placement::BeforeCursor)),
            "append" => Ok(Self::Append(repair()?)),
            "vehicle" => rest
                .parse::<usize>()
                .map(Self::Vehicle)
                .map_err(|_| anyhow!("`vehicle` expects a position, got {rest:?}")),
            other => bail!("unknown command `{other}`"),
        }
    }
}

/// Parse a whole script, keeping the line number of each command
fn parse_script(script: &str) -> Result<Vec<(usize, SessionCommand)>> {
    script
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_number, line)| {
            line.parse::<SessionCommand>()
                .map(|command| (line_number, command))
                .with_context(|| format!("line {line_number}"))
        })
        .collect()
}

fn describe_current(queue: &RepairQueue) -> String {
    match (queue.position(), queue.current()) {
        (Some(position), Some(repair)) => format!("#{position} {repair}"),
        _ => "none (queue exhausted)".to_string(),
    }
}

/// Apply one command, writing its transcript line
fn apply<W: Write>(queue: &mut RepairQueue, command: SessionCommand, out: &mut W) -> Result<()> {
    match command {
        SessionCommand::Current => writeln!(out, "current: {}", describe_current(queue))?,
        SessionCommand::Next => {
            if queue.is_exhausted() {
                bail!("no repair left to advance past");
            }
            queue.advance();
            writeln!(out, "next: {}", describe_current(queue))?;
        }
        SessionCommand::Insert(repair, placement) => {
            let label = match placement {
                Placement::AfterCursor => "loyal",
                Placement::BeforeCursor => "priority",
            };
            let line = format!("{label}: {repair}");
            queue.insert(repair, placement);
            writeln!(out, "{line}")?;
        }
        SessionCommand::Append(repair) => {
            writeln!(out, "append: {repair}")?;
            queue.append(repair);
        }
        SessionCommand::Vehicle(position) => {
            let vehicle = queue.vehicle_at(position)?;
            writeln!(out, "vehicle {position}: {vehicle}")?;
        }
        SessionCommand::MaxCost => writeln!(out, "max cost: {:.2}", queue.max_cost())?,
        SessionCommand::Size => writeln!(out, "size: {}", queue.len())?,
        SessionCommand::List => write!(out, "{queue}")?,
    }
    Ok(())
}

/// Run a script against the queue
///
/// The script is parsed up front, so a typo on the last line stops the
/// session before anything runs. Runtime failures name the script line.
pub fn run_script<W: Write>(queue: &mut RepairQueue, script: &str, out: &mut W) -> Result<()> {
    let commands = parse_script(script)?;
    for (line_number, command) in commands {
        apply(queue, command, out).with_context(|| format!("line {line_number}"))?;
    }
    Ok(())
}

/// Handle the `session` command
pub fn handle_session_command(script_path: &Path, mut queue: RepairQueue) -> Result<()> {
    let script = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read session script {}", script_path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_script(&mut queue, &script, &mut out)?;

    info!(
        remaining = queue.remaining().len(),
        size = queue.len(),
        "session finished"
    );
    Ok(())
}
