//! Order books
//!
//! Market data line: `productId` followed by ten fractional prices. The
//! first five are the bids from the fifth level up to the top of book, the
//! last five the offers from the top of book down to the fifth level.
//! Level `i` (0 = top) carries `1_000_000 * (i + 1)`.

use std::sync::Arc;

use soa::{LineDecoder, Listener, Service, ServiceError, Subscriber};
use types::bond::BondReference;
use types::errors::{RecordError, ReferenceError};
use types::fraction::from_fractional;
use types::market_data::{BidOffer, BookOrder, OrderBook};
use types::order::PricingSide;

use crate::feeds::split_fields;

/// Price levels per side on a market data line
pub const BOOK_DEPTH: usize = 5;

/// Quantity of the top level; level `i` carries `(i + 1)` times this
pub const LEVEL_QUANTITY: i64 = 1_000_000;

/// Latest order book per product
pub struct MarketDataService {
    store: Service<OrderBook>,
}

impl MarketDataService {
    pub fn new() -> Self {
        Self {
            store: Service::new("market_data"),
        }
    }

    pub fn register_listener(&mut self, listener: Box<dyn Listener<OrderBook>>) {
        self.store.register_listener(listener);
    }

    pub fn get(&self, product_id: &str) -> Option<&OrderBook> {
        self.store.get(product_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn book(&self, product_id: &str) -> Result<&OrderBook, ReferenceError> {
        self.store
            .get(product_id)
            .ok_or_else(|| ReferenceError::not_found("order book", product_id))
    }

    /// Top of the bid stack and top of the offer stack
    pub fn best_bid_offer(&self, product_id: &str) -> Result<BidOffer, ReferenceError> {
        self.book(product_id)?
            .best_bid_offer()
            .ok_or_else(|| ReferenceError::not_found("best bid/offer", product_id))
    }

    /// Copy of the book with levels at the same price merged per side
    pub fn aggregate_depth(&self, product_id: &str) -> Result<OrderBook, ReferenceError> {
        let book = self.book(product_id)?;
        Ok(OrderBook::new(
            book.product.clone(),
            merge_levels(&book.bid_stack),
            merge_levels(&book.offer_stack),
        ))
    }
}

impl Default for MarketDataService {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriber<OrderBook> for MarketDataService {
    fn on_message(&mut self, book: OrderBook) -> Result<(), ServiceError> {
        self.store.ingest(book)
    }
}

/// Sum quantities of levels sharing a price, keeping first-seen order
fn merge_levels(levels: &[BookOrder]) -> Vec<BookOrder> {
    let mut merged: Vec<BookOrder> = Vec::with_capacity(levels.len());
    for level in levels {
        match merged.iter_mut().find(|m| m.price == level.price) {
            Some(existing) => existing.quantity += level.quantity,
            None => merged.push(level.clone()),
        }
    }
    merged
}

pub struct OrderBookDecoder {
    reference: Arc<BondReference>,
}

impl OrderBookDecoder {
    pub fn new(reference: Arc<BondReference>) -> Self {
        Self { reference }
    }
}

impl LineDecoder for OrderBookDecoder {
    type Record = OrderBook;

    fn decode(&self, line: &str) -> Result<OrderBook, RecordError> {
        let fields = split_fields(line, 1 + 2 * BOOK_DEPTH)?;
        let bond = self.reference.bond(fields[0])?;

        let mut bid_stack = Vec::with_capacity(BOOK_DEPTH);
        let mut offer_stack = Vec::with_capacity(BOOK_DEPTH);
        for level in 0..BOOK_DEPTH {
            let quantity = LEVEL_QUANTITY * (level as i64 + 1);
            let bid = from_fractional(fields[BOOK_DEPTH - level])?;
            let offer = from_fractional(fields[BOOK_DEPTH + 1 + level])?;
            bid_stack.push(BookOrder::new(bid, quantity, PricingSide::Bid));
            offer_stack.push(BookOrder::new(offer, quantity, PricingSide::Offer));
        }

        Ok(OrderBook::new(bond, bid_stack, offer_stack))
    }
}
