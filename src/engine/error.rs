//! Error types for pump operations.

use thiserror::Error;

use crate::amount::AmountError;
use crate::model::PumpStatus;

/// Top-level error returned by [`Pump`](super::Pump) and
/// [`PumpSession`](super::PumpSession) operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Operator input could not be used as a prepaid amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Operation called in a state that does not allow it. Always a defect
    /// in the caller.
    #[error("{0:?} is not allowed while the pump is {1:?}")]
    InvalidState(PumpOperation, PumpStatus),
}

/// The pump operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOperation {
    Start,
    Tick,
    Abort,
    Finalize,
}
