//! Trading desk
//!
//! Connects every output sink, drains the four input feeds through the
//! service graph and closes the sinks.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trading_desk::{Desk, DeskConfig};
use types::bond::BondReference;

/// Fixed-income trading desk
#[derive(Parser, Debug)]
#[command(name = "trading-desk")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE", env = "DESK_CONFIG")]
    config: Option<PathBuf>,

    /// Host running the feed peers
    #[arg(long)]
    host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_config(args: &Args) -> Result<DeskConfig> {
    let config = match &args.config {
        Some(path) => DeskConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DeskConfig::default(),
    };
    let mut config = config.with_env_override();

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;

    init_tracing(&config.log_level);

    tracing::info!("Trading desk v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        host = %config.host,
        gui_throttle_ms = config.gui.throttle_ms,
        gui_max_publishes = config.gui.max_publishes,
        "configuration loaded"
    );

    let reference = Arc::new(BondReference::treasuries());
    let desk = Desk::connect(config, reference).context("connecting sinks")?;

    let summary = desk.run_all();
    tracing::info!(
        ingested = ?summary.ingested,
        failed = ?summary.failed,
        "all feeds processed"
    );

    desk.shutdown().context("closing sinks")?;
    Ok(())
}
