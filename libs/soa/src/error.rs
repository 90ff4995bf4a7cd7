//! Transport and ingestion errors

use std::io;
use thiserror::Error;
use types::errors::{RecordError, ReferenceError};

/// Socket transport failures
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Peer {peer} closed the connection")]
    PeerClosed { peer: String },

    #[error("Stream {name} refused by peer: {reply}")]
    Handshake { name: String, reply: String },

    #[error("Connector {name} is closed")]
    Closed { name: String },
}

/// Failure anywhere along an ingestion chain
///
/// Returned by listeners and propagated back through `Service::ingest` to
/// whoever drives the chain, normally a source connector's drain loop.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_error_wraps() {
        let err: ServiceError = ReferenceError::unknown("X").into();
        assert!(matches!(err, ServiceError::Reference(_)));
        assert_eq!(err.to_string(), "Reference error: Unknown product: X");
    }

    #[test]
    fn test_connector_error_wraps() {
        let err: ServiceError = ConnectorError::PeerClosed {
            peer: "127.0.0.1:1".to_string(),
        }
        .into();
        assert!(err.to_string().contains("closed the connection"));
    }
}
