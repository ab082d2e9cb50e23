//! Line-oriented operator console for the pump.
//!
//! The shell reads one command per line, owns the tick driver that advances
//! a running fill on a fixed cadence, and renders pump state to its writer.

use std::io::{self, Write};
use std::str::FromStr;

use thiserror::Error;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

use crate::engine::{EngineError, Pump};
use crate::model::{FuelGrade, ParseGradeError, PumpSnapshot};

pub const STARTING: &str = "Starting pump...";
pub const COMPLETED: &str = "Pumping complete!";
pub const STOPPED: &str = "Emergency stop activated!";
pub const INVALID_AMOUNT: &str = "Input Error: Please enter a valid dollar amount.";

const USAGE_START: &str = "usage: start <grade> <amount>";

/// An operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Begin a fill. The amount is kept as typed; the pump validates it.
    Start { grade: FuelGrade, amount: String },
    Stop,
    History,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list of commands")]
    Unknown(String),

    #[error("{0}")]
    Usage(&'static str),

    #[error(transparent)]
    Grade(#[from] ParseGradeError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();

        match name.as_str() {
            "start" | "pump" => {
                let grade = words.next().ok_or(CommandError::Usage(USAGE_START))?;
                let amount = words.collect::<Vec<_>>().join(" ");
                if amount.is_empty() {
                    return Err(CommandError::Usage(USAGE_START));
                }
                Ok(Command::Start {
                    grade: grade.parse()?,
                    amount,
                })
            }
            "stop" => Ok(Command::Stop),
            "history" => Ok(Command::History),
            "status" => Ok(Command::Status),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(name)),
        }
    }
}

/// Whether the shell keeps reading input after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<W> {
    pump: Pump,
    out: W,
    history_visible: bool,
}

impl<W: Write> Shell<W> {
    pub fn new(pump: Pump, out: W) -> Self {
        Self {
            pump,
            out,
            history_visible: false,
        }
    }

    pub fn pump(&self) -> &Pump {
        &self.pump
    }

    pub fn history_visible(&self) -> bool {
        self.history_visible
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn greet(&mut self) -> io::Result<()> {
        writeln!(self.out, "Fuel pump ready. Type 'help' for a list of commands.")
    }

    /// Process commands from `input` while ticking any running fill.
    ///
    /// Returns on `quit`, or once the input has ended and no fill is
    /// running anymore.
    pub async fn run(&mut self, mut input: impl Stream<Item = String> + Unpin) -> io::Result<()> {
        let mut ticker = None;
        let mut input_open = true;

        loop {
            self.sync_ticker(&mut ticker);
            if !input_open && ticker.is_none() {
                break;
            }

            tokio::select! {
                line = input.next(), if input_open => match line {
                    Some(line) => {
                        if self.handle_line(&line)? == Flow::Quit {
                            break;
                        }
                    }
                    None => input_open = false,
                },
                _ = next_tick(&mut ticker) => self.on_tick()?,
            }
        }

        self.out.flush()
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(e) => {
                warn!(input = line, reason = %e, "command rejected");
                writeln!(self.out, "{e}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Start { grade, amount } => self.start(grade, &amount)?,
            Command::Stop => {
                if self.pump.is_running() {
                    self.stop()?;
                } else {
                    writeln!(self.out, "Emergency stop is only available while pumping.")?;
                }
            }
            Command::History => self.toggle_history()?,
            Command::Status => match self.pump.snapshot() {
                Some(snapshot) => writeln!(self.out, "{}", render_status(&snapshot))?,
                None => writeln!(self.out, "Pump is idle.")?,
            },
            Command::Help => self.help()?,
            Command::Quit => {
                if self.pump.is_running() {
                    self.stop()?;
                }
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    /// One step of the driver: advance the fill and render it.
    pub fn on_tick(&mut self) -> io::Result<()> {
        let result = match self.pump.tick() {
            Ok(result) => result,
            Err(e) => {
                warn!(reason = %e, "tick skipped");
                return Ok(());
            }
        };

        let Some(snapshot) = self.pump.snapshot() else {
            return Ok(());
        };
        if result.done {
            writeln!(self.out, "{}\n\n{COMPLETED}", render_status(&snapshot))
        } else {
            writeln!(self.out, "{}", render_progress(&snapshot))
        }
    }

    /// Show the history when hidden, hide it when shown.
    pub fn toggle_history(&mut self) -> io::Result<()> {
        self.history_visible = !self.history_visible;
        if self.history_visible {
            writeln!(self.out, "Transaction History:\n{}", self.pump.history().render())
        } else {
            writeln!(self.out, "History hidden.")
        }
    }

    fn start(&mut self, grade: FuelGrade, amount: &str) -> io::Result<()> {
        if self.pump.is_running() {
            return writeln!(self.out, "Pump is already running.");
        }

        match self.pump.start(grade, amount) {
            Ok(()) => writeln!(self.out, "{STARTING}"),
            Err(EngineError::InvalidAmount(_)) => writeln!(self.out, "{INVALID_AMOUNT}"),
            Err(e) => writeln!(self.out, "{e}"),
        }
    }

    fn stop(&mut self) -> io::Result<()> {
        if let Err(e) = self.pump.abort() {
            warn!(reason = %e, "stop skipped");
            return writeln!(self.out, "{e}");
        }
        match self.pump.snapshot() {
            Some(snapshot) => writeln!(self.out, "{}\n\n{STOPPED}", render_status(&snapshot)),
            None => writeln!(self.out, "{STOPPED}"),
        }
    }

    fn help(&mut self) -> io::Result<()> {
        writeln!(self.out, "Commands:")?;
        writeln!(self.out, "  start <grade> <amount>  start pumping for a prepaid amount")?;
        writeln!(self.out, "  stop                    emergency stop")?;
        writeln!(self.out, "  history                 show or hide the transaction history")?;
        writeln!(self.out, "  status                  show the current pump status")?;
        writeln!(self.out, "  quit                    stop the pump and exit")?;
        writeln!(self.out, "Grades:")?;
        for grade in FuelGrade::ALL {
            writeln!(self.out, "  {:<8} ${}", grade.name(), grade.unit_price())?;
        }
        Ok(())
    }

    /// Keep an interval only while a fill is running.
    fn sync_ticker(&self, ticker: &mut Option<Interval>) {
        match (self.pump.is_running(), ticker.is_some()) {
            (true, false) => {
                let period = self.pump.config().tick_interval;
                let mut interval = time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                *ticker = Some(interval);
            }
            (false, true) => *ticker = None,
            _ => {}
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

pub fn render_status(snapshot: &PumpSnapshot) -> String {
    format!(
        "Fuel Type: {}\nPrice per Gallon: ${}\nAmount Entered: ${}\nGallons Pumped: {}\nCost So Far: ${}",
        snapshot.grade, snapshot.unit_price, snapshot.prepaid, snapshot.volume, snapshot.cost
    )
}

pub fn render_progress(snapshot: &PumpSnapshot) -> String {
    format!(
        "Gallons Pumped: {} | Cost So Far: ${}",
        snapshot.volume, snapshot.cost
    )
}
