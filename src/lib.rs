pub mod amount;
pub mod config;
pub mod engine;
pub mod history;
pub mod model;
pub mod shell;
pub mod volume;

pub use amount::{Amount, AmountError};
pub use config::PumpConfig;
pub use engine::{EngineError, Pump, PumpSession, TickResult};
pub use history::TransactionHistory;
pub use model::{FuelGrade, PumpSnapshot, PumpStatus, TransactionRecord};
pub use shell::Shell;
pub use volume::Volume;
