//! APD Sensor Daemon
//!
//! Polls the enabled sensors on a fixed cadence and prints their readings.

mod config;
mod poller;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use poller::{Output, Poller};

#[derive(Parser)]
#[command(name = "apdd")]
#[command(about = "Polls APD sensors and reports their readings")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults are used when omitted)
    config: Option<PathBuf>,

    /// Read every enabled sensor once and exit
    #[arg(long)]
    once: bool,

    /// Print readings as JSON lines
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for readings
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive("info".parse()?)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => {
            let config = Config::load(path).context("Failed to load configuration")?;
            info!("Loaded configuration from: {}", path.display());
            config
        }
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let output = if cli.json { Output::Json } else { Output::Text };
    let probes = poller::build_probes(&config)?;
    let mut poller = Poller::new(probes, output);
    if poller.is_empty() {
        warn!("No sensors enabled");
    }

    if cli.once {
        return poller.cycle().await;
    }

    let interval = Duration::from_millis(config.poll.max(1));
    info!("Polling {} sensors every {:?}", poller.len(), interval);

    // Setup Unix signal handlers
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                poller.cycle().await?;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down");
                break;
            }
        }
    }

    Ok(())
}
