use crate::config::PumpConfig;
use crate::engine::error::{EngineError, PumpOperation};
use crate::model::{FuelGrade, PumpSnapshot, PumpStatus, TransactionRecord};
use crate::{Amount, AmountError, Volume};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    /// The prepaid amount has been dispensed and the session is completed.
    pub done: bool,
}

/// One fill, from start until it is completed or aborted.
///
/// While running, `volume * unit_price` stays strictly below `prepaid`.
/// Once terminal, `volume` never changes.
#[derive(Debug, Clone)]
pub struct PumpSession {
    grade: FuelGrade,
    unit_price: Amount,
    prepaid: Amount,
    volume: Volume,
    flow_per_tick: Volume,
    status: PumpStatus,
}

impl PumpSession {
    /// Start a fill with the default flow rate.
    pub fn start(grade: FuelGrade, prepaid: Amount) -> Result<Self, EngineError> {
        Self::start_with_config(grade, prepaid, &PumpConfig::default())
    }

    pub fn start_with_config(
        grade: FuelGrade,
        prepaid: Amount,
        config: &PumpConfig,
    ) -> Result<Self, EngineError> {
        if !prepaid.is_positive() {
            return Err(AmountError::NotPositive(prepaid).into());
        }

        Ok(Self {
            grade,
            unit_price: grade.unit_price(),
            prepaid,
            volume: Volume::ZERO,
            flow_per_tick: config.flow_per_tick,
            status: PumpStatus::Running,
        })
    }

    /// Advance the fill by one step:
    /// - If one more increment stays under budget, accept it
    /// - Otherwise dispense exactly what the budget buys and complete
    pub fn tick(&mut self) -> Result<TickResult, EngineError> {
        self.ensure_running(PumpOperation::Tick)?;

        let candidate = self.volume + self.flow_per_tick;
        if candidate.cost_at(self.unit_price) < self.prepaid {
            self.volume = candidate.round_to_thousandths();
            return Ok(TickResult { done: false });
        }

        // Recompute from the budget rather than keeping the overshooting candidate
        self.volume = self
            .prepaid
            .volume_at(self.unit_price)
            .round_to_thousandths();
        self.status = PumpStatus::Completed;
        Ok(TickResult { done: true })
    }

    /// Stop the fill, freezing the volume dispensed so far.
    pub fn abort(&mut self) -> Result<(), EngineError> {
        self.ensure_running(PumpOperation::Abort)?;
        self.status = PumpStatus::Aborted;
        Ok(())
    }

    /// Cost of the volume dispensed so far, rounded to cents.
    pub fn current_cost(&self) -> Amount {
        self.volume.cost_at(self.unit_price).round_to_cents()
    }

    /// Produce the record of a completed or aborted fill.
    pub fn finalize(&self) -> Result<TransactionRecord, EngineError> {
        if !self.status.is_terminal() {
            return Err(EngineError::InvalidState(
                PumpOperation::Finalize,
                self.status,
            ));
        }

        Ok(TransactionRecord {
            grade: self.grade,
            prepaid: self.prepaid,
            volume: self.volume,
            cost: self.current_cost(),
            status: self.status,
        })
    }

    pub fn snapshot(&self) -> PumpSnapshot {
        PumpSnapshot {
            grade: self.grade,
            unit_price: self.unit_price,
            prepaid: self.prepaid,
            volume: self.volume,
            cost: self.current_cost(),
            status: self.status,
        }
    }

    pub fn grade(&self) -> FuelGrade {
        self.grade
    }

    pub fn unit_price(&self) -> Amount {
        self.unit_price
    }

    pub fn prepaid(&self) -> Amount {
        self.prepaid
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn status(&self) -> PumpStatus {
        self.status
    }

    fn ensure_running(&self, op: PumpOperation) -> Result<(), EngineError> {
        if self.status != PumpStatus::Running {
            return Err(EngineError::InvalidState(op, self.status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn session(grade: FuelGrade, prepaid: Amount) -> PumpSession {
        PumpSession::start(grade, prepaid).unwrap()
    }

    fn run_to_completion(session: &mut PumpSession) -> u32 {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if session.tick().unwrap().done {
                return ticks;
            }
        }
    }

    #[test]
    fn start_initial_state() {
        let session = session(FuelGrade::Plus, Amount::new(dec!(20)));
        assert_eq!(session.grade(), FuelGrade::Plus);
        assert_eq!(session.unit_price(), Amount::new(dec!(3.89)));
        assert_eq!(session.prepaid(), Amount::new(dec!(20)));
        assert_eq!(session.volume(), Volume::ZERO);
        assert_eq!(session.status(), PumpStatus::Running);
        assert_eq!(session.current_cost(), Amount::default());
    }

    #[test]
    fn start_rejects_non_positive_amount() {
        let err = PumpSession::start(FuelGrade::Regular, Amount::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidAmount(AmountError::NotPositive(_))
        ));

        let err = PumpSession::start(FuelGrade::Regular, Amount::new(dec!(-1))).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    // Tick

    #[test]
    fn tick_accumulates_fixed_increment() {
        let mut session = session(FuelGrade::Regular, Amount::new(dec!(10)));
        for _ in 0..3 {
            assert_eq!(session.tick().unwrap(), TickResult { done: false });
        }
        assert_eq!(session.volume(), Volume::new(dec!(0.015)));
        assert_eq!(session.status(), PumpStatus::Running);
    }

    #[test]
    fn regular_ten_dollars_completes_at_budget() {
        let mut session = session(FuelGrade::Regular, Amount::new(dec!(10.00)));
        let ticks = run_to_completion(&mut session);

        assert_eq!(ticks, 574);
        assert_eq!(session.status(), PumpStatus::Completed);
        assert_eq!(session.volume(), Volume::new(dec!(2.865)));
        assert_eq!(session.current_cost(), Amount::new(dec!(10.00)));
    }

    #[test]
    fn exact_budget_completes_on_reaching_it() {
        // 200 * 0.005 * 3.49 == 3.49 exactly
        let mut session = session(FuelGrade::Regular, Amount::new(dec!(3.49)));
        let ticks = run_to_completion(&mut session);

        assert_eq!(ticks, 200);
        assert_eq!(session.volume(), Volume::new(dec!(1.000)));
        assert_eq!(session.current_cost(), Amount::new(dec!(3.49)));
    }

    #[test]
    fn tiny_budget_completes_on_first_tick() {
        let mut session = session(FuelGrade::Diesel, Amount::new(dec!(0.01)));
        assert_eq!(session.tick().unwrap(), TickResult { done: true });
        // 0.01 / 4.49 = 0.00222..
        assert_eq!(session.volume(), Volume::new(dec!(0.002)));
        assert_eq!(session.current_cost(), Amount::new(dec!(0.01)));
    }

    #[test]
    fn running_cost_stays_under_budget() {
        let prepaid = Amount::new(dec!(1.00));
        let mut session = session(FuelGrade::Premium, prepaid);
        while !session.tick().unwrap().done {
            assert!(session.volume().cost_at(session.unit_price()) < prepaid);
        }
        assert!(session.current_cost() <= prepaid);
    }

    #[test]
    fn tick_after_completion_fails() {
        let mut session = session(FuelGrade::Diesel, Amount::new(dec!(0.05)));
        run_to_completion(&mut session);
        let volume = session.volume();

        let err = session.tick().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidState(PumpOperation::Tick, PumpStatus::Completed)
        ));
        assert_eq!(session.volume(), volume);
    }

    // Abort

    #[test]
    fn diesel_abort_after_three_ticks() {
        let mut session = session(FuelGrade::Diesel, Amount::new(dec!(5.00)));
        for _ in 0..3 {
            session.tick().unwrap();
        }
        session.abort().unwrap();

        assert_eq!(session.status(), PumpStatus::Aborted);
        assert_eq!(session.volume(), Volume::new(dec!(0.015)));
        assert_eq!(session.current_cost(), Amount::new(dec!(0.07)));
    }

    #[test]
    fn abort_freezes_volume() {
        let mut session = session(FuelGrade::Plus, Amount::new(dec!(5)));
        session.tick().unwrap();
        session.abort().unwrap();

        let err = session.tick().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidState(PumpOperation::Tick, PumpStatus::Aborted)
        ));
        assert_eq!(session.volume(), Volume::new(dec!(0.005)));
    }

    #[test]
    fn abort_twice_fails() {
        let mut session = session(FuelGrade::Plus, Amount::new(dec!(5)));
        session.abort().unwrap();
        let err = session.abort().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidState(PumpOperation::Abort, PumpStatus::Aborted)
        ));
    }

    #[test]
    fn abort_after_completion_fails() {
        let mut session = session(FuelGrade::Diesel, Amount::new(dec!(0.01)));
        session.tick().unwrap();
        assert!(session.abort().is_err());
        assert_eq!(session.status(), PumpStatus::Completed);
    }

    // Finalize

    #[test]
    fn finalize_running_fails() {
        let session = session(FuelGrade::Regular, Amount::new(dec!(1)));
        let err = session.finalize().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidState(PumpOperation::Finalize, PumpStatus::Running)
        ));
    }

    #[test]
    fn finalize_completed_matches_current_cost() {
        let mut session = session(FuelGrade::Regular, Amount::new(dec!(10)));
        run_to_completion(&mut session);
        let record = session.finalize().unwrap();

        assert_eq!(record.grade, FuelGrade::Regular);
        assert_eq!(record.prepaid, Amount::new(dec!(10)));
        assert_eq!(record.volume, session.volume());
        assert_eq!(record.cost, session.current_cost());
        assert_eq!(record.status, PumpStatus::Completed);
    }

    #[test]
    fn finalize_aborted_matches_current_cost() {
        let mut session = session(FuelGrade::Diesel, Amount::new(dec!(5)));
        session.tick().unwrap();
        session.tick().unwrap();
        session.abort().unwrap();
        let record = session.finalize().unwrap();

        assert_eq!(record.volume, Volume::new(dec!(0.010)));
        assert_eq!(record.cost, session.current_cost());
        assert_eq!(record.status, PumpStatus::Aborted);
    }

    #[test]
    fn custom_flow_rate() {
        let config = PumpConfig {
            flow_per_tick: Volume::new(dec!(0.5)),
            ..PumpConfig::default()
        };
        let mut session =
            PumpSession::start_with_config(FuelGrade::Regular, Amount::new(dec!(10)), &config)
                .unwrap();
        session.tick().unwrap();
        assert_eq!(session.volume(), Volume::new(dec!(0.500)));
    }

    #[test]
    fn snapshot_reflects_session() {
        let mut session = session(FuelGrade::Premium, Amount::new(dec!(2)));
        session.tick().unwrap();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.grade, FuelGrade::Premium);
        assert_eq!(snapshot.unit_price, Amount::new(dec!(4.19)));
        assert_eq!(snapshot.prepaid, Amount::new(dec!(2)));
        assert_eq!(snapshot.volume, Volume::new(dec!(0.005)));
        // 0.005 * 4.19 = 0.02095
        assert_eq!(snapshot.cost, Amount::new(dec!(0.02)));
        assert_eq!(snapshot.status, PumpStatus::Running);
    }
}
