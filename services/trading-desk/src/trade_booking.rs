//! Trade booking
//!
//! Trades arrive from the trade feed and from executions. Trade feed line:
//! `productId,tradeId,book,price,BUY|SELL,quantity` with a decimal price.

use std::sync::Arc;

use soa::{LineDecoder, Listener, Service, ServiceError, Shared, Subscriber};
use types::bond::BondReference;
use types::errors::RecordError;
use types::execution::ExecutionOrder;
use types::position::BOOKS;
use types::trade::Trade;

use crate::feeds::{parse_decimal, parse_quantity, split_fields};

/// Booked trades keyed by trade id
pub struct TradeBookingService {
    store: Service<Trade>,
}

impl TradeBookingService {
    pub fn new() -> Self {
        Self {
            store: Service::new("trade_booking"),
        }
    }

    pub fn register_listener(&mut self, listener: Box<dyn Listener<Trade>>) {
        self.store.register_listener(listener);
    }

    pub fn get(&self, trade_id: &str) -> Option<&Trade> {
        self.store.get(trade_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Book a trade and notify listeners
    pub fn book_trade(&mut self, trade: Trade) -> Result<(), ServiceError> {
        self.store.ingest(trade)
    }
}

impl Default for TradeBookingService {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriber<Trade> for TradeBookingService {
    fn on_message(&mut self, trade: Trade) -> Result<(), ServiceError> {
        self.book_trade(trade)
    }
}

/// Books one trade per execution, cycling TRSY2, TRSY3, TRSY1, ...
pub struct TradeBookingListener {
    service: Shared<TradeBookingService>,
    count: usize,
}

impl TradeBookingListener {
    pub fn new(service: Shared<TradeBookingService>) -> Self {
        Self { service, count: 0 }
    }
}

impl Listener<ExecutionOrder> for TradeBookingListener {
    fn on_add(&mut self, order: &ExecutionOrder) -> Result<(), ServiceError> {
        self.count += 1;
        let book = BOOKS[self.count % BOOKS.len()];
        let trade = Trade::new(
            order.product.clone(),
            order.order_id.clone(),
            order.price,
            book,
            order.visible_quantity,
            order.side.trade_side(),
        );
        self.service.borrow_mut().book_trade(trade)
    }
}

pub struct TradeDecoder {
    reference: Arc<BondReference>,
}

impl TradeDecoder {
    pub fn new(reference: Arc<BondReference>) -> Self {
        Self { reference }
    }
}

impl LineDecoder for TradeDecoder {
    type Record = Trade;

    fn decode(&self, line: &str) -> Result<Trade, RecordError> {
        let fields = split_fields(line, 6)?;
        let bond = self.reference.bond(fields[0])?;
        Ok(Trade::new(
            bond,
            fields[1],
            parse_decimal("price", fields[3])?,
            fields[2],
            parse_quantity("quantity", fields[5])?,
            fields[4].parse()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use soa::shared;
    use types::order::{OrderType, PricingSide, Side};

    fn decoder() -> TradeDecoder {
        TradeDecoder::new(Arc::new(BondReference::treasuries()))
    }

    #[test]
    fn test_decode_trade_line() {
        let trade = decoder()
            .decode("91282CAX9,TradeId0,TRSY2,99.0,BUY,1000000")
            .unwrap();
        assert_eq!(trade.trade_id, "TradeId0");
        assert_eq!(trade.book, "TRSY2");
        assert_eq!(trade.price, Decimal::from(99));
        assert_eq!(trade.side, Side::BUY);
        assert_eq!(trade.quantity, 1_000_000);
    }

    #[test]
    fn test_decode_rejects_bad_side_and_quantity() {
        assert!(matches!(
            decoder().decode("91282CAX9,T,TRSY1,99.0,HOLD,1000000"),
            Err(RecordError::InvalidField { .. })
        ));
        assert!(decoder()
            .decode("91282CAX9,T,TRSY1,99.0,SELL,lots")
            .is_err());
        assert!(decoder().decode("91282CAX9,T,TRSY1,99.0,SELL").is_err());
    }

    #[test]
    fn test_executions_cycle_books() {
        let booking = shared(TradeBookingService::new());
        let mut listener = TradeBookingListener::new(booking.clone());
        let product = BondReference::treasuries().bond("91282CAX9").unwrap();

        let sides = [
            ("1", PricingSide::Bid),
            ("2", PricingSide::Offer),
            ("3", PricingSide::Bid),
            ("4", PricingSide::Offer),
        ];
        for (id, side) in sides {
            let order = ExecutionOrder {
                product: product.clone(),
                side,
                order_id: id.to_string(),
                order_type: OrderType::Market,
                price: Decimal::from(100),
                visible_quantity: 2_000_000,
                hidden_quantity: 2_000_000,
                parent_order_id: id.to_string(),
                is_child_order: false,
            };
            listener.on_add(&order).unwrap();
        }

        let booking = booking.borrow();
        assert_eq!(booking.get("1").unwrap().book, "TRSY2");
        assert_eq!(booking.get("2").unwrap().book, "TRSY3");
        assert_eq!(booking.get("3").unwrap().book, "TRSY1");
        assert_eq!(booking.get("4").unwrap().book, "TRSY2");
        assert_eq!(booking.get("1").unwrap().side, Side::BUY);
        assert_eq!(booking.get("2").unwrap().side, Side::SELL);
        assert_eq!(booking.get("2").unwrap().quantity, 2_000_000);
    }
}
