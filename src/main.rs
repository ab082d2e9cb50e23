use std::io::{self, BufRead};
use std::thread;

use fuel_pump::{Pump, Shell};
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let (line_sender, line_receiver) = tokio::sync::mpsc::channel(16);

    // blocking stdin reads stay off the runtime so exiting never waits on them
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_sender.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("failed to read input: {e}");
                    break;
                }
            }
        }
    });

    let mut shell = Shell::new(Pump::new(), io::stdout().lock());
    shell.greet()?;
    shell.run(ReceiverStream::new(line_receiver)).await
}
