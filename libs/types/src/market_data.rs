//! Order book types
//!
//! Stacks are ordered top of book first: `bid_stack[0]` is the best bid and
//! `offer_stack[0]` the best offer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bond::Bond;
use crate::order::PricingSide;
use crate::record::Record;

/// A single price level of an order book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOrder {
    pub price: Decimal,
    pub quantity: i64,
    pub side: PricingSide,
}

impl BookOrder {
    pub fn new(price: Decimal, quantity: i64, side: PricingSide) -> Self {
        Self {
            price,
            quantity,
            side,
        }
    }
}

/// Best bid and best offer of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidOffer {
    pub bid: BookOrder,
    pub offer: BookOrder,
}

impl BidOffer {
    pub fn spread(&self) -> Decimal {
        self.offer.price - self.bid.price
    }
}

/// Order book for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    pub product: Bond,
    pub bid_stack: Vec<BookOrder>,
    pub offer_stack: Vec<BookOrder>,
}

impl OrderBook {
    pub fn new(product: Bond, bid_stack: Vec<BookOrder>, offer_stack: Vec<BookOrder>) -> Self {
        Self {
            product,
            bid_stack,
            offer_stack,
        }
    }

    pub fn best_bid(&self) -> Option<&BookOrder> {
        self.bid_stack.first()
    }

    pub fn best_offer(&self) -> Option<&BookOrder> {
        self.offer_stack.first()
    }

    /// Top of both stacks, `None` if either side is empty
    pub fn best_bid_offer(&self) -> Option<BidOffer> {
        Some(BidOffer {
            bid: self.best_bid()?.clone(),
            offer: self.best_offer()?.clone(),
        })
    }

    /// Best offer minus best bid
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_offer()?.price - self.best_bid()?.price)
    }
}

impl Record for OrderBook {
    fn identifier(&self) -> &str {
        self.product.product_id.as_str()
    }
}
