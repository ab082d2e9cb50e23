//! Pump simulation engine.
//!
//! The engine owns the session of a single pump and the log of finished
//! fills. A session is started from operator input, advanced one tick at a
//! time by an external driver, and either completes once the prepaid amount
//! is dispensed or is aborted by the operator. Finished sessions are turned
//! into [`TransactionRecord`]s and appended to the history.
//! Also supports driving the pump from an async stream of commands.

use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::Amount;
use crate::config::PumpConfig;
use crate::history::TransactionHistory;
use crate::model::{FuelGrade, PumpSnapshot, PumpStatus, TransactionRecord};

mod session;
pub use session::{PumpSession, TickResult};

mod error;
pub use error::{EngineError, PumpOperation};

/// Input accepted by [`Pump::run`], for callers that schedule ticks
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpCommand {
    Tick,
    Abort,
}

/// A single fuel pump.
///
/// Keeps the current (or last finished) session around for display until
/// the next fill is started.
pub struct Pump {
    config: PumpConfig,
    session: Option<PumpSession>,
    history: TransactionHistory,
}

/// Public API
impl Pump {
    pub fn new() -> Self {
        Self::with_config(PumpConfig::default())
    }

    pub fn with_config(config: PumpConfig) -> Self {
        Self {
            config,
            session: None,
            history: TransactionHistory::new(),
        }
    }

    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// Start a fill from operator input.
    ///
    /// Nothing changes when the amount is rejected or a fill is already
    /// running.
    pub fn start(&mut self, grade: FuelGrade, amount_text: &str) -> Result<(), EngineError> {
        let status = self.status();
        if status == PumpStatus::Running {
            return Err(EngineError::InvalidState(PumpOperation::Start, status));
        }

        let prepaid = Amount::parse(amount_text).inspect_err(|e| {
            warn!(grade = %grade, input = amount_text, reason = %e, "fill rejected");
        })?;
        let session = PumpSession::start_with_config(grade, prepaid, &self.config)?;

        info!(
            grade = %grade,
            unit_price = %session.unit_price(),
            prepaid = %prepaid,
            "fill started"
        );
        self.session = Some(session);
        Ok(())
    }

    /// Advance the running fill by one tick, recording it once done.
    pub fn tick(&mut self) -> Result<TickResult, EngineError> {
        let session = self.running_session(PumpOperation::Tick)?;
        let result = session.tick()?;
        debug!(volume = %session.volume(), cost = %session.current_cost(), "tick");

        if result.done {
            let record = session.finalize()?;
            info!(
                grade = %record.grade,
                volume = %record.volume,
                cost = %record.cost,
                "fill completed"
            );
            self.history.append(record);
        }
        Ok(result)
    }

    /// Stop the running fill and record it.
    pub fn abort(&mut self) -> Result<(), EngineError> {
        let session = self.running_session(PumpOperation::Abort)?;
        session.abort()?;

        let record = session.finalize()?;
        info!(
            grade = %record.grade,
            volume = %record.volume,
            cost = %record.cost,
            "fill aborted"
        );
        self.history.append(record);
        Ok(())
    }

    /// Drive the pump with the given command stream until it ends.
    ///
    /// For embedding the pump behind a caller-owned scheduler; the console
    /// drives it through [`Shell::run`](crate::shell::Shell::run) instead.
    pub async fn run(&mut self, mut commands: impl Stream<Item = PumpCommand> + Unpin) {
        while let Some(command) = commands.next().await {
            let result = match command {
                PumpCommand::Tick => self.tick().map(|_| ()),
                PumpCommand::Abort => self.abort(),
            };
            // a misplaced command must not stop the driver
            if let Err(e) = result {
                warn!(command = ?command, reason = %e, "command skipped");
            }
        }
    }

    pub fn status(&self) -> PumpStatus {
        self.session
            .as_ref()
            .map_or(PumpStatus::Idle, PumpSession::status)
    }

    pub fn is_running(&self) -> bool {
        self.status() == PumpStatus::Running
    }

    pub fn snapshot(&self) -> Option<PumpSnapshot> {
        self.session.as_ref().map(PumpSession::snapshot)
    }

    pub fn history(&self) -> &TransactionHistory {
        &self.history
    }

    /// Most recently recorded fill.
    pub fn last_record(&self) -> Option<&TransactionRecord> {
        self.history.all().last()
    }
}

/// Private API
impl Pump {
    fn running_session(&mut self, op: PumpOperation) -> Result<&mut PumpSession, EngineError> {
        match self.session.as_mut() {
            Some(session) if session.status() == PumpStatus::Running => Ok(session),
            Some(session) => Err(EngineError::InvalidState(op, session.status())),
            None => Err(EngineError::InvalidState(op, PumpStatus::Idle)),
        }
    }
}

impl Default for Pump {
    fn default() -> Self {
        Self::new()
    }
}
