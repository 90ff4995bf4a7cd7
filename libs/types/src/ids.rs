//! Product identifier type
//!
//! Products are US Treasuries identified by CUSIP. Trade, order and
//! inquiry identifiers arrive as free-form strings from the feeds and are
//! kept as `String` on their records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CUSIP of a bond product
///
/// Used as the store key for prices, order books, positions, risk and
/// price streams.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ProductId from a string
    pub fn new(cusip: impl Into<String>) -> Self {
        Self(cusip.into())
    }

    /// Get the CUSIP string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
