//! Feed server CLI
//!
//! # Commands
//!
//! - `feed-server source --port <p>`: serve one input stream
//! - `feed-server sink --port <p>`: record one output stream
//! - `feed-server serve-all`: every desk stream on its default port
//! - `feed-server generate`: write synthetic input feeds

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feed_server::{generate, serve_sink, serve_source, GenerateCounts};

/// Peer process for the trading desk's connectors
#[derive(Parser)]
#[command(name = "feed-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory stream names are resolved against
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Interface to listen on
    #[arg(long, global = true, default_value = "127.0.0.1")]
    host: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a file one line per request
    Source {
        #[arg(short, long)]
        port: u16,
    },

    /// Append pushed lines to a file
    Sink {
        #[arg(short, long)]
        port: u16,
    },

    /// Serve every input feed and record every output stream
    ServeAll,

    /// Write prices.txt, trades.txt, marketdata.txt and inquiries.txt
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "./data")]
        out_dir: PathBuf,

        /// RNG seed
        #[arg(short, long, default_value = "1")]
        seed: u64,

        /// Rounds of price updates
        #[arg(long, default_value = "10000")]
        prices: usize,

        /// Rounds of trades
        #[arg(long, default_value = "10")]
        trades: usize,

        /// Rounds of order books
        #[arg(long, default_value = "10000")]
        market_data: usize,

        /// Rounds of inquiries
        #[arg(long, default_value = "10")]
        inquiries: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Source,
    Sink,
}

/// Default desk wiring: prices, gui, trades, market data, executions,
/// positions, risk, streaming, inquiries, all inquiries
const DESK_STREAMS: [(u16, Role); 10] = [
    (1234, Role::Source),
    (1235, Role::Sink),
    (1236, Role::Source),
    (1237, Role::Source),
    (1238, Role::Sink),
    (1239, Role::Sink),
    (1240, Role::Sink),
    (1241, Role::Sink),
    (1242, Role::Source),
    (1243, Role::Sink),
];

fn serve(host: &str, port: u16, role: Role, root: &Path) -> Result<usize> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).with_context(|| format!("binding {addr}"))?;
    info!(%addr, ?role, "listening");
    let lines = match role {
        Role::Source => serve_source(&listener, root)?,
        Role::Sink => serve_sink(&listener, root)?,
    };
    Ok(lines)
}

fn serve_all(host: &str, root: &Path) -> Result<()> {
    let failures = thread::scope(|scope| {
        let handles: Vec<_> = DESK_STREAMS
            .iter()
            .map(|&(port, role)| (port, scope.spawn(move || serve(host, port, role, root))))
            .collect();

        let mut failures = 0;
        for (port, handle) in handles {
            match handle.join() {
                Ok(Ok(lines)) => info!(port, lines, "stream finished"),
                Ok(Err(e)) => {
                    error!(port, error = %e, "stream failed");
                    failures += 1;
                }
                Err(_) => {
                    error!(port, "stream thread panicked");
                    failures += 1;
                }
            }
        }
        failures
    });

    if failures > 0 {
        return Err(anyhow!("{failures} stream(s) failed"));
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    info!("Feed server v{}", feed_server::VERSION);

    match cli.command {
        Commands::Source { port } => {
            serve(&cli.host, port, Role::Source, &cli.root)?;
        }
        Commands::Sink { port } => {
            serve(&cli.host, port, Role::Sink, &cli.root)?;
        }
        Commands::ServeAll => serve_all(&cli.host, &cli.root)?,
        Commands::Generate {
            out_dir,
            seed,
            prices,
            trades,
            market_data,
            inquiries,
        } => {
            let counts = GenerateCounts {
                prices,
                trades,
                market_data,
                inquiries,
            };
            generate(&out_dir, seed, counts)?;
        }
    }
    Ok(())
}
