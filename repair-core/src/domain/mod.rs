//! Core domain types
//!
//! This module contains the value types handled by the repair queue.
//! They are shared between the queue itself and the record sources that
//! decode persisted batches.

pub mod repair;
