//! Booked trades

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bond::Bond;
use crate::order::Side;
use crate::record::Record;

/// A trade booked into one of the desk's books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub product: Bond,
    pub trade_id: String,
    pub price: Decimal,
    pub book: String,
    pub quantity: i64,
    pub side: Side,
}

impl Trade {
    pub fn new(
        product: Bond,
        trade_id: impl Into<String>,
        price: Decimal,
        book: impl Into<String>,
        quantity: i64,
        side: Side,
    ) -> Self {
        Self {
            product,
            trade_id: trade_id.into(),
            price,
            book: book.into(),
            quantity,
            side,
        }
    }

    /// Quantity signed by side: BUY positive, SELL negative
    pub fn signed_quantity(&self) -> i64 {
        self.side.sign() * self.quantity
    }
}

impl Record for Trade {
    fn identifier(&self) -> &str {
        &self.trade_id
    }
}
