//! Sides, order types and execution venues

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RecordError;

/// Side of a two-way price or book level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PricingSide {
    Bid,
    Offer,
}

impl PricingSide {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            PricingSide::Bid => PricingSide::Offer,
            PricingSide::Offer => PricingSide::Bid,
        }
    }

    /// Trade side produced by executing on this side: a bid buys
    pub fn trade_side(&self) -> Side {
        match self {
            PricingSide::Bid => Side::BUY,
            PricingSide::Offer => Side::SELL,
        }
    }
}

impl fmt::Display for PricingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingSide::Bid => write!(f, "BID"),
            PricingSide::Offer => write!(f, "OFFER"),
        }
    }
}

/// Trade or inquiry side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    BUY,
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }

    /// Sign applied to a quantity when it reaches a position
    pub fn sign(&self) -> i64 {
        match self {
            Side::BUY => 1,
            Side::SELL => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::BUY => write!(f, "BUY"),
            Side::SELL => write!(f, "SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Side::BUY),
            "SELL" => Ok(Side::SELL),
            other => Err(RecordError::invalid("side", other)),
        }
    }
}

/// Execution order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Fok,
    Ioc,
    Market,
    Limit,
    Stop,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::Fok => "FOK",
            OrderType::Ioc => "IOC",
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Stop => "STOP",
        };
        f.write_str(s)
    }
}

/// Execution venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    Brokertec,
    Espeed,
    Cme,
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Market::Brokertec => "BROKERTEC",
            Market::Espeed => "ESPEED",
            Market::Cme => "CME",
        };
        f.write_str(s)
    }
}
