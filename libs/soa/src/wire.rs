//! Line-framed TCP channel
//!
//! Every message is one line. Outbound lines end with exactly one `\n`;
//! inbound lines have trailing `\r`/`\n` stripped before use.
//!
//! ```text
//! handshake:  <name>\n            -> success\n
//! source:     <name>\n            -> <csv>\n | EOF\n
//! sink:       <ts>,<csv>\n        -> <ack>\n
//! teardown:   EOF\n
//! ```

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};

use tracing::{debug, info};

use crate::error::ConnectorError;

/// End-of-stream sentinel, in both directions
pub const EOF_SENTINEL: &str = "EOF";

/// Acknowledgement line sent by a peer
pub const ACK: &str = "success";

/// One socket, read and written a line at a time
pub struct LineChannel {
    peer: String,
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl LineChannel {
    /// Open a connection to `addr`
    pub fn connect(addr: impl ToSocketAddrs + std::fmt::Display) -> Result<Self, ConnectorError> {
        let peer = addr.to_string();
        let stream = TcpStream::connect(&addr).map_err(|source| ConnectorError::Connect {
            addr: peer.clone(),
            source,
        })?;
        info!(peer = %peer, "connected");
        Self::from_stream(stream)
    }

    /// Wrap an accepted or already connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self, ConnectorError> {
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        stream.set_nodelay(true)?;
        let writer = stream.try_clone()?;
        Ok(Self {
            peer,
            reader: BufReader::new(stream),
            writer,
        })
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Write `line` followed by exactly one newline
    pub fn send_line(&mut self, line: &str) -> Result<(), ConnectorError> {
        let body = line.trim_end_matches(['\r', '\n']);
        let mut framed = String::with_capacity(body.len() + 1);
        framed.push_str(body);
        framed.push('\n');
        self.writer.write_all(framed.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Block until one full line arrives; `PeerClosed` if the stream ends first
    pub fn recv_line(&mut self) -> Result<String, ConnectorError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(ConnectorError::PeerClosed {
                peer: self.peer.clone(),
            });
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Send one line and wait for the reply line
    pub fn round_trip(&mut self, line: &str) -> Result<String, ConnectorError> {
        self.send_line(line)?;
        self.recv_line()
    }

    /// Client side of the handshake: announce the stream name, read the ack
    pub fn handshake(&mut self, name: &str) -> Result<(), ConnectorError> {
        let reply = self.round_trip(name)?;
        if reply == EOF_SENTINEL {
            return Err(ConnectorError::Handshake {
                name: name.to_string(),
                reply,
            });
        }
        debug!(stream = %name, reply = %reply, "handshake acknowledged");
        Ok(())
    }
}
