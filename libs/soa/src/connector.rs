//! Source and sink connectors
//!
//! A `SourceConnector` pulls one line per request from its peer, decodes
//! it and hands the record to a `Subscriber`, until the peer answers
//! `EOF`. A `SinkConnector` pushes one timestamped line per record and
//! waits for the acknowledgement before returning.

use std::fmt::Display;
use std::marker::PhantomData;
use std::net::ToSocketAddrs;

use chrono::Utc;
use tracing::{debug, info, warn};
use types::errors::RecordError;
use types::record::WireEncode;

use crate::error::{ConnectorError, ServiceError};
use crate::service::{Publisher, Subscriber};
use crate::wire::{LineChannel, EOF_SENTINEL};

/// Turns one inbound feed line into a record
pub trait LineDecoder {
    type Record;

    fn decode(&self, line: &str) -> Result<Self::Record, RecordError>;
}

// ── Source ──────────────────────────────────────────────────────────

/// Pull connector bound to one named input stream
pub struct SourceConnector<D> {
    name: String,
    channel: LineChannel,
    decoder: D,
}

impl<D: LineDecoder> SourceConnector<D> {
    /// Connect and complete the handshake for stream `name`
    pub fn connect(
        addr: impl ToSocketAddrs + Display,
        name: impl Into<String>,
        decoder: D,
    ) -> Result<Self, ConnectorError> {
        let name = name.into();
        let mut channel = LineChannel::connect(addr)?;
        channel.handshake(&name)?;
        info!(stream = %name, peer = %channel.peer(), "source connected");
        Ok(Self {
            name,
            channel,
            decoder,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drain the stream into `target`, one request per record
    ///
    /// Returns the number of records ingested once the peer sends `EOF`.
    /// The first decode, transport or downstream error stops the drain.
    pub fn subscribe<S>(&mut self, target: &mut S) -> Result<usize, ServiceError>
    where
        S: Subscriber<D::Record> + ?Sized,
    {
        let mut ingested = 0;
        loop {
            let line = self.channel.round_trip(&self.name)?;
            if line == EOF_SENTINEL {
                break;
            }
            let record = self.decoder.decode(&line)?;
            target.on_message(record)?;
            ingested += 1;
            debug!(stream = %self.name, ingested, "record ingested");
        }
        info!(stream = %self.name, ingested, "drain finished");
        Ok(ingested)
    }
}

// ── Sink ────────────────────────────────────────────────────────────

/// Push connector bound to one named output stream
///
/// Sends `EOF` on `close`, or on drop if never closed.
pub struct SinkConnector<V> {
    name: String,
    channel: Option<LineChannel>,
    published: u64,
    _record: PhantomData<fn(&V)>,
}

impl<V: WireEncode> SinkConnector<V> {
    /// Connect and complete the handshake for stream `name`
    pub fn connect(addr: impl ToSocketAddrs + Display, name: impl Into<String>) -> Result<Self, ConnectorError> {
        let name = name.into();
        let mut channel = LineChannel::connect(addr)?;
        channel.handshake(&name)?;
        info!(stream = %name, peer = %channel.peer(), "sink connected");
        Ok(Self {
            name,
            channel: Some(channel),
            published: 0,
            _record: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records acknowledged by the peer so far
    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn is_closed(&self) -> bool {
        self.channel.is_none()
    }
}

impl<V: WireEncode> Publisher<V> for SinkConnector<V> {
    fn publish(&mut self, record: &V) -> Result<(), ConnectorError> {
        let channel = self.channel.as_mut().ok_or_else(|| ConnectorError::Closed {
            name: self.name.clone(),
        })?;
        let line = format!("{},{}", Utc::now().timestamp_millis(), record.to_wire());
        channel.round_trip(&line)?;
        self.published += 1;
        debug!(stream = %self.name, published = self.published, "record published");
        Ok(())
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        if let Some(mut channel) = self.channel.take() {
            channel.send_line(EOF_SENTINEL)?;
            info!(stream = %self.name, published = self.published, "sink closed");
        }
        Ok(())
    }
}

impl<V> Drop for SinkConnector<V> {
    fn drop(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.send_line(EOF_SENTINEL) {
                warn!(stream = %self.name, error = %e, "failed to send EOF on drop");
            }
        }
    }
}
