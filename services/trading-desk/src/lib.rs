//! Fixed-income trading desk
//!
//! Domain services wired into one synchronous processing graph:
//!
//! ```text
//! trades      -> TradeBooking -> Position -> Risk -> risk sink
//!                                        \-> positions sink
//! market data -> MarketData -> AlgoExecution -> Execution -> TradeBooking
//!                                                        \-> executions sink
//! prices      -> Pricing -> Gui (throttled) -> gui sink
//!                       \-> AlgoStreaming -> Streaming -> streaming sink
//! inquiries   -> Inquiry <-> QuoteConnector
//!                       \-> all-inquiries sink
//! ```
//!
//! Each input feed is drained by a source connector; every output leaves
//! through a sink connector owned by a `HistoricalDataService` (or the GUI).

pub mod config;
pub mod error;
pub mod feeds;
pub mod pricing;
pub mod market_data;
pub mod algo_execution;
pub mod execution;
pub mod trade_booking;
pub mod position;
pub mod risk;
pub mod algo_streaming;
pub mod streaming;
pub mod gui;
pub mod inquiry;
pub mod historical;
pub mod desk;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, DeskConfig};
pub use desk::{Desk, DeskSinks, RunSummary};
pub use error::{DeskError, DeskResult};
