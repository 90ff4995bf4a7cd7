//! Feed peer for the trading desk
//!
//! The desk never touches files itself. This crate plays the other end of
//! its connectors:
//! - `server`: one stream per listening socket, either serving a file a
//!   line per request (source role) or recording pushed lines (sink role)
//! - `generator`: deterministic synthetic input feeds

pub mod server;
pub mod generator;

pub use generator::{generate, GenerateCounts};
pub use server::{serve_sink, serve_source, ServerError};

/// Feed server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
