use std::time::Duration;

use rust_decimal_macros::dec;

use crate::Volume;

/// Tunables for the simulated pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpConfig {
    /// Wall-clock time between two ticks of the shell's driver.
    pub tick_interval: Duration,

    /// Volume dispensed on every non-final tick.
    pub flow_per_tick: Volume,
}

impl PumpConfig {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
    pub const DEFAULT_FLOW_PER_TICK: Volume = Volume::new(dec!(0.005));
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            flow_per_tick: Self::DEFAULT_FLOW_PER_TICK,
        }
    }
}
