//! Repair Core
//!
//! Core types for the daily repair queue of a vehicle service shop.
//!
//! This crate contains:
//! - Domain types: the repair request record
//! - Queue: the ordered service queue with its "now servicing" cursor
//! - Source: decoding of persisted record batches (text and JSON)
//! - Errors: failure types shared by the above

pub mod domain;
pub mod error;
pub mod queue;
pub mod source;

pub use domain::repair::Repair;
pub use error::{IngestError, LoadError, QueueError, RepairError};
pub use queue::{Placement, RepairQueue};
pub use source::RecordFormat;
