//! Core domain types for the pump simulator.

use std::fmt;
use std::str::FromStr;

use rust_decimal_macros::dec;
use thiserror::Error;

use crate::{Amount, Volume};

/// Fuel grades offered at the pump, each with a fixed unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuelGrade {
    Regular,
    Plus,
    Premium,
    Diesel,
}

impl FuelGrade {
    /// All grades in menu order.
    pub const ALL: [FuelGrade; 4] = [
        FuelGrade::Regular,
        FuelGrade::Plus,
        FuelGrade::Premium,
        FuelGrade::Diesel,
    ];

    /// Price per volume unit.
    pub const fn unit_price(self) -> Amount {
        match self {
            FuelGrade::Regular => Amount::new(dec!(3.49)),
            FuelGrade::Plus => Amount::new(dec!(3.89)),
            FuelGrade::Premium => Amount::new(dec!(4.19)),
            FuelGrade::Diesel => Amount::new(dec!(4.49)),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FuelGrade::Regular => "Regular",
            FuelGrade::Plus => "Plus",
            FuelGrade::Premium => "Premium",
            FuelGrade::Diesel => "Diesel",
        }
    }
}

impl fmt::Display for FuelGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown fuel grade '{0}'")]
pub struct ParseGradeError(pub String);

impl FromStr for FuelGrade {
    type Err = ParseGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FuelGrade::ALL
            .into_iter()
            .find(|grade| grade.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseGradeError(s.to_string()))
    }
}

/// Lifecycle of a pump session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PumpStatus {
    /// No fill has been started.
    #[default]
    Idle,
    /// Fuel is flowing; ticks are accepted.
    Running,
    /// The prepaid amount was dispensed.
    Completed,
    /// Stopped by the operator before the prepaid amount was reached.
    Aborted,
}

impl PumpStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PumpStatus::Completed | PumpStatus::Aborted)
    }
}

/// Immutable summary of a finished fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub grade: FuelGrade,
    pub prepaid: Amount,
    pub volume: Volume,
    /// Final cost, rounded to cents.
    pub cost: Amount,
    /// Either `Completed` or `Aborted`.
    pub status: PumpStatus,
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fuel: {} | Amount: ${} | Gallons: {} | Cost: ${}",
            self.grade, self.prepaid, self.volume, self.cost
        )
    }
}

/// Read-only view of a session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpSnapshot {
    pub grade: FuelGrade,
    pub unit_price: Amount,
    pub prepaid: Amount,
    pub volume: Volume,
    pub cost: Amount,
    pub status: PumpStatus,
}
