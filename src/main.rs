//! # Drone Telemetry
//!
//! Live dashboard feed for a simulated drone.
//!
//! Ticks a simulated flight once per refresh interval, prints each snapshot
//! (or streams it as JSON lines for a charting front end) and exports the full
//! flight log as CSV when the session ends.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use drone_telemetry::config::{Config, OUTPUT_JSON};
use drone_telemetry::dashboard::renderer::{JsonRenderer, Renderer, TextRenderer};
use drone_telemetry::export::encoder::write_flight_log;
use drone_telemetry::session::{Session, SessionSettings};
use drone_telemetry::telemetry::clock::SystemClock;
use drone_telemetry::telemetry::simulator::TelemetrySimulator;
use drone_telemetry::telemetry::source::SimulatedSource;
use drone_telemetry::telemetry::types::FlightMode;

/// Capacity of the flight mode input channel
const MODE_CHANNEL_CAPACITY: usize = 8;

/// Simulated drone telemetry dashboard
#[derive(Debug, Parser)]
#[command(name = "drone-telemetry", version, about)]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible flight
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Initial flight mode (manual, stabilize, altitude-hold)
    #[arg(short, long)]
    mode: Option<FlightMode>,

    /// Tick interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Stream snapshots as JSON lines instead of the text readout
    #[arg(long)]
    json: bool,

    /// Where to write the flight log CSV
    #[arg(long, conflicts_with = "no_export")]
    export: Option<String>,

    /// Do not export the flight log
    #[arg(long)]
    no_export: bool,
}

impl Cli {
    /// Load the configuration file (if any) and apply command line overrides
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(ticks) = self.ticks {
            config.simulation.max_ticks = Some(ticks);
        }
        if let Some(mode) = self.mode {
            config.simulation.flight_mode = mode;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.simulation.tick_interval_ms = interval_ms;
        }
        if self.json {
            config.dashboard.output = OUTPUT_JSON.to_string();
        }
        if let Some(path) = self.export {
            config.export.enabled = true;
            config.export.path = path;
        }
        if self.no_export {
            config.export.enabled = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Initialize tracing to stderr, plus a daily rolling file when configured
///
/// The returned guard must be held until exit so buffered file logs are flushed.
fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    match &config.logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &config.logging.file_prefix);
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr.and(file_writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

/// Forward flight mode selections, one per line, until input ends or the
/// session hangs up
///
/// Accepts `m`/`manual`, `s`/`stabilize`, `a`/`alt`/`altitude-hold`. Blank
/// lines are skipped, anything else is logged and ignored.
fn forward_modes<B: BufRead>(input: B, tx: &mpsc::Sender<FlightMode>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read stdin: {}", e);
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<FlightMode>() {
            Ok(mode) => {
                if tx.blocking_send(mode).is_err() {
                    return;
                }
            }
            Err(e) => warn!("Ignoring input: {}", e),
        }
    }
    debug!("Flight mode input closed");
}

/// Read flight mode selections from stdin
///
/// Runs on a plain thread so a pending read never holds up runtime shutdown.
fn spawn_mode_input(tx: mpsc::Sender<FlightMode>) {
    std::thread::spawn(move || forward_modes(std::io::stdin().lock(), &tx));
}

/// Main entry point for the Drone Telemetry application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Parse command line and load configuration
///    - Set up logging with tracing subscriber
///    - Build the simulated source, simulator and renderer
///
/// 2. **Main Loop**
///    - Tick once per interval (1s by default) and render the snapshot
///    - Apply flight mode changes read from stdin between ticks
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Shutdown**
///    - Export the full flight log to CSV (unless disabled)
///
/// # Examples
///
/// ```bash
/// cargo run --release -- --seed 42 --ticks 60 --export flight_log.csv
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;
    let _log_guard = init_logging(&config);

    info!("Drone Telemetry v{} starting...", env!("CARGO_PKG_VERSION"));

    let source = match config.simulation.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            SimulatedSource::seeded(seed)
        }
        None => SimulatedSource::from_entropy(),
    };
    let simulator = TelemetrySimulator::new(source, SystemClock);

    let renderer: Box<dyn Renderer> = if config.json_output() {
        Box::new(JsonRenderer::new(std::io::stdout()))
    } else {
        Box::new(TextRenderer::new(std::io::stdout()))
    };

    let mut session = Session::new(simulator, renderer, SessionSettings::from_config(&config));

    let (mode_tx, mode_rx) = mpsc::channel(MODE_CHANNEL_CAPACITY);
    spawn_mode_input(mode_tx);

    info!("Type m / s / a + Enter to switch flight mode, Ctrl+C to exit");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down...");
    };

    let run_result = session.run(mode_rx, shutdown).await;

    let state = session.into_state();
    if config.export.enabled {
        write_flight_log(&config.export.path, state.log())
            .with_context(|| format!("failed to export flight log to {}", config.export.path))?;
    }

    run_result?;
    Ok(())
}
