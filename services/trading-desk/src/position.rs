//! Positions per product and book

use std::sync::Arc;

use soa::{Listener, Service, ServiceError, Shared};
use types::bond::BondReference;
use types::errors::ReferenceError;
use types::position::Position;
use types::trade::Trade;

/// Latest position per product
pub struct PositionService {
    store: Service<Position>,
    reference: Arc<BondReference>,
}

impl PositionService {
    pub fn new(reference: Arc<BondReference>) -> Self {
        Self {
            store: Service::new("position"),
            reference,
        }
    }

    pub fn register_listener(&mut self, listener: Box<dyn Listener<Position>>) {
        self.store.register_listener(listener);
    }

    pub fn get(&self, product_id: &str) -> Option<&Position> {
        self.store.get(product_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Apply `trade` to the product's position and ingest the result
    pub fn add_trade(&mut self, trade: &Trade) -> Result<(), ServiceError> {
        let product_id = trade.product.product_id.as_str();
        if !self.reference.contains(product_id) {
            return Err(ReferenceError::unknown(product_id).into());
        }
        let next = match self.store.get(product_id) {
            Some(current) => current.with_trade(trade),
            None => Position::new(trade.product.clone()).with_trade(trade),
        };
        self.store.ingest(next)
    }
}

/// Feeds booked trades into positions
pub struct PositionListener {
    service: Shared<PositionService>,
}

impl PositionListener {
    pub fn new(service: Shared<PositionService>) -> Self {
        Self { service }
    }
}

impl Listener<Trade> for PositionListener {
    fn on_add(&mut self, trade: &Trade) -> Result<(), ServiceError> {
        self.service.borrow_mut().add_trade(trade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use types::bond::{Bond, BondIdType};
    use types::ids::ProductId;
    use types::order::Side;

    fn trade(product: Bond, book: &str, qty: i64, side: Side) -> Trade {
        Trade::new(product, "T", Decimal::from(99), book, qty, side)
    }

    #[test]
    fn test_positions_accumulate_per_book() {
        let reference = Arc::new(BondReference::treasuries());
        let bond = reference.bond("91282CAX9").unwrap();
        let mut service = PositionService::new(reference);

        service.add_trade(&trade(bond.clone(), "TRSY1", 1_000_000, Side::BUY)).unwrap();
        service.add_trade(&trade(bond.clone(), "TRSY2", 2_000_000, Side::SELL)).unwrap();
        service.add_trade(&trade(bond, "TRSY1", 3_000_000, Side::BUY)).unwrap();

        let position = service.get("91282CAX9").unwrap();
        assert_eq!(position.position("TRSY1"), 4_000_000);
        assert_eq!(position.position("TRSY2"), -2_000_000);
        assert_eq!(position.aggregate(), 2_000_000);
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_unknown_product_is_reference_error() {
        let reference = Arc::new(BondReference::treasuries());
        let mut service = PositionService::new(reference);
        let stray = Bond::new(
            ProductId::new("XXXX"),
            BondIdType::Cusip,
            "T",
            Decimal::ZERO,
            chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        );
        let err = service
            .add_trade(&trade(stray, "TRSY1", 1, Side::BUY))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Reference(_)));
        assert!(service.is_empty());
    }
}
