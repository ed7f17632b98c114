//! Interactive LIFX console.
//!
//! Run with: cargo run -- --help

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use lifx_console::{BulbSpec, ConsoleConfig, Output, Session, SimulatedFleet, console};
use log::error;
use tokio::io::BufReader;

#[derive(Parser)]
#[command(name = "lifx-console")]
#[command(about = "Discover and control LIFX lights from an interactive console", long_about = None)]
struct Cli {
    /// Seconds during which a reboot can still be cancelled
    #[arg(long, default_value_t = 3)]
    reboot_delay: u64,

    /// Milliseconds simulated devices take to answer a query
    #[arg(long, default_value_t = 150)]
    latency_ms: u64,

    /// Milliseconds between simulated devices announcing themselves
    #[arg(long, default_value_t = 200)]
    stagger_ms: u64,

    /// Simulated device as <label>:<product id>; repeat for more devices
    #[arg(long = "bulb", value_name = "LABEL:PID")]
    bulbs: Vec<BulbSpec>,
}

impl Cli {
    fn into_config(self) -> ConsoleConfig {
        let fleet = if self.bulbs.is_empty() {
            SimulatedFleet::default_specs()
        } else {
            self.bulbs
        };
        ConsoleConfig {
            reboot_delay: Duration::from_secs(self.reboot_delay),
            latency: Duration::from_millis(self.latency_ms),
            stagger: Duration::from_millis(self.stagger_ms),
            fleet,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();
    let config = Cli::parse().into_config();

    let (out, screen) = Output::channel();
    let printer = tokio::spawn(screen.pipe_to(tokio::io::stdout()));

    out.line("Hit \"Enter\" to start");
    out.line("Use Ctrl-C to quit");

    let (_devices, events) = config.simulated_fleet().start();
    let mut session = Session::new(out, config);
    let result = console::run(&mut session, BufReader::new(tokio::io::stdin()), events).await;
    drop(session);

    match printer.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!("{err}"),
        Err(err) => error!("output task failed: {err}"),
    }
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
