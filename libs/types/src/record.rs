//! Capabilities every record exposes to the engine
//!
//! A service keys its store by `Record::identifier`. A record that leaves the
//! graph through a sink connector also implements `WireEncode`, which yields
//! the comma-separated body of its output line. The sink prefixes the
//! millisecond timestamp and the line terminator.

/// Keyed record held by a service
pub trait Record {
    /// Store key: product id, trade id, order id or inquiry id
    fn identifier(&self) -> &str;
}

/// Record that can be written to an output feed
pub trait WireEncode {
    /// Comma-separated fields, no timestamp and no newline
    fn to_wire(&self) -> String;
}
