//! Error types for the repair queue

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a repair record is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepairError {
    /// Vehicle identifier is empty
    #[error("vehicle identifier is empty")]
    EmptyVehicle,

    /// Vehicle identifier contains whitespace
    #[error("vehicle identifier {0:?} contains whitespace")]
    InvalidVehicle(String),

    /// Cost is negative, NaN or infinite
    #[error("cost {0} is not a finite non-negative amount")]
    InvalidCost(f64),

    /// Textual record has a vehicle but no cost
    #[error("missing cost")]
    MissingCost,

    /// Cost field is not a number
    #[error("cost {0:?} is not a number")]
    UnparsableCost(String),

    /// Textual record has more than two fields
    #[error("unexpected trailing field {0:?}")]
    UnexpectedField(String),
}

/// Errors that can occur while loading a batch of records
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be opened or read
    #[error("could not read {}: {source}", .path.display())]
    Io {
        /// Path of the source, or `<stream>` for readers
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of a text source did not parse into a record
    #[error("line {line}: {reason}")]
    Malformed {
        /// 1-indexed line number within the source
        line: usize,
        /// Human readable description of the problem
        reason: String,
    },

    /// A JSON source could not be decoded
    #[error("invalid JSON record batch: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON record decoded but failed validation
    #[error("record {index}: {source}")]
    InvalidRecord {
        /// 1-indexed position of the record within the batch
        index: usize,
        #[source]
        source: RepairError,
    },
}

impl LoadError {
    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed-line error
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }

    /// Check if the source itself was unavailable, as opposed to badly formed
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Errors returned by positional queue lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Ordinal outside `1..=len`
    #[error("position {position} is out of range for a queue of {len} repair(s)")]
    OutOfRange { position: usize, len: usize },
}

/// Stream ingestion stopped before end-of-stream
///
/// Records read before the failure stay appended to the queue.
#[derive(Debug, Error)]
#[error("ingestion stopped after {appended} record(s): {source}")]
pub struct IngestError {
    /// Number of records appended before the failure
    pub appended: usize,
    #[source]
    pub source: LoadError,
}
