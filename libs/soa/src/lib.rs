//! Service-oriented engine for the trading desk
//!
//! Every domain service is a keyed store of its latest records plus an
//! ordered list of listeners notified synchronously on each ingestion.
//! Records enter and leave the graph through connectors that speak a
//! newline-framed request/response protocol with a peer process.
//!
//! # Modules
//! - `service`: `Service<V>`, `Listener<V>`, `Subscriber<V>`, `Publisher<V>`
//! - `wire`: line-framed TCP channel and the protocol constants
//! - `connector`: source (pull) and sink (push) connectors
//! - `error`: transport and ingestion errors
//!
//! # Execution model
//! Single-threaded. An ingestion runs the whole downstream chain, including
//! sink round trips, before it returns. The service graph must be acyclic.

pub mod service;
pub mod wire;
pub mod connector;
pub mod error;

pub use connector::{LineDecoder, SinkConnector, SourceConnector};
pub use error::{ConnectorError, ServiceError};
pub use service::{shared, Listener, Publisher, Service, Shared, Subscriber};
pub use wire::{LineChannel, ACK, EOF_SENTINEL};
