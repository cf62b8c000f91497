//! Repair request domain type

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::RepairError;

/// A single repair request: which vehicle, and what the job costs
///
/// Records are validated on construction and have no mutable accessors, so a
/// record placed in the queue never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repair {
    vehicle: String,
    cost: f64,
}

impl Repair {
    /// Creates a repair request
    ///
    /// # Errors
    /// Returns an error if:
    /// - `vehicle` is empty or contains whitespace
    /// - `cost` is negative, NaN or infinite
    pub fn new(vehicle: impl Into<String>, cost: f64) -> Result<Self, RepairError> {
        let vehicle = vehicle.into();
        if vehicle.is_empty() {
            return Err(RepairError::EmptyVehicle);
        }
        if vehicle.chars().any(char::is_whitespace) {
            return Err(RepairError::InvalidVehicle(vehicle));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(RepairError::InvalidCost(cost));
        }
        Ok(Self { vehicle, cost })
    }

    /// Vehicle identifier, usually the licence plate
    pub fn vehicle(&self) -> &str {
        &self.vehicle
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }
}

/// Parses `<vehicle> <cost>`, separated by any amount of whitespace
impl FromStr for Repair {
    type Err = RepairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let vehicle = fields.next().ok_or(RepairError::EmptyVehicle)?;
        let cost = fields.next().ok_or(RepairError::MissingCost)?;
        if let Some(extra) = fields.next() {
            return Err(RepairError::UnexpectedField(extra.to_string()));
        }

        let cost = cost
            .parse::<f64>()
            .map_err(|_| RepairError::UnparsableCost(cost.to_string()))?;

        Self::new(vehicle, cost)
    }
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5} {:>10.2}", self.vehicle, self.cost)
    }
}
