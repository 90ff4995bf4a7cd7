//! Per-book positions
//!
//! A position holds the signed quantity of one product in each book. A
//! trade produces the next position value; the previous one is never
//! mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bond::Bond;
use crate::record::{Record, WireEncode};
use crate::trade::Trade;

/// The desk's trading books, in output column order
pub const BOOKS: [&str; 3] = ["TRSY1", "TRSY2", "TRSY3"];

/// Signed quantity per book for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub product: Bond,
    positions: BTreeMap<String, i64>,
}

impl Position {
    /// Flat position
    pub fn new(product: Bond) -> Self {
        Self {
            product,
            positions: BTreeMap::new(),
        }
    }

    /// Next position after booking `trade`: BUY adds, SELL subtracts
    pub fn with_trade(&self, trade: &Trade) -> Self {
        let mut next = self.clone();
        *next.positions.entry(trade.book.clone()).or_insert(0) += trade.signed_quantity();
        next
    }

    /// Position in one book, zero if never traded
    pub fn position(&self, book: &str) -> i64 {
        self.positions.get(book).copied().unwrap_or(0)
    }

    /// Sum over all books
    pub fn aggregate(&self) -> i64 {
        self.positions.values().sum()
    }

    pub fn books(&self) -> impl Iterator<Item = (&str, i64)> {
        self.positions.iter().map(|(book, qty)| (book.as_str(), *qty))
    }
}

impl Record for Position {
    fn identifier(&self) -> &str {
        self.product.product_id.as_str()
    }
}

/// `productId,TRSY1,TRSY2,TRSY3,aggregate`
impl WireEncode for Position {
    fn to_wire(&self) -> String {
        let mut line = self.product.product_id.to_string();
        for book in BOOKS {
            line.push(',');
            line.push_str(&self.position(book).to_string());
        }
        line.push(',');
        line.push_str(&self.aggregate().to_string());
        line
    }
}
