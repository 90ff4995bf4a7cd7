//! Types library for the fixed-income trading desk
//!
//! Every record that flows through the service graph is defined here,
//! together with the bond reference data the records are built from and
//! the fractional price notation used on the wire.
//!
//! Records are immutable values. A state change (a position absorbing a
//! trade, an inquiry being quoted) is expressed by constructing the next
//! value and re-ingesting it.
//!
//! # Modules
//! - `ids`: Product identifiers (CUSIPs)
//! - `fraction`: `I-xyz` treasury price notation
//! - `bond`: Bond product and the reference data table
//! - `order`: Sides, order types and markets
//! - `market_data`: Order book, book levels, best bid/offer
//! - `pricing`: Mid/spread internal prices
//! - `trade`: Booked trades
//! - `position`: Per-book positions
//! - `risk`: PV01 risk and bucketed sectors
//! - `execution`: Execution orders
//! - `streaming`: Two-way price streams
//! - `inquiry`: Customer inquiries and their states
//! - `record`: Capabilities every record exposes to the engine
//! - `errors`: Error taxonomy

pub mod ids;
pub mod fraction;
pub mod bond;
pub mod order;
pub mod market_data;
pub mod pricing;
pub mod trade;
pub mod position;
pub mod risk;
pub mod execution;
pub mod streaming;
pub mod inquiry;
pub mod record;
pub mod errors;

