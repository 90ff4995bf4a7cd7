//! PV01 risk
//!
//! Risk per product is the reference PV01 times the aggregate position.
//! Sector risk is the quantity-weighted PV01 of its members.

use rust_decimal::Decimal;
use std::sync::Arc;

use soa::{Listener, Service, ServiceError, Shared};
use types::bond::{Bond, BondReference};
use types::errors::ReferenceError;
use types::position::Position;
use types::risk::{BucketedSector, Pv01};

/// Latest risk per product
pub struct RiskService {
    store: Service<Pv01<Bond>>,
    reference: Arc<BondReference>,
}

impl RiskService {
    pub fn new(reference: Arc<BondReference>) -> Self {
        Self {
            store: Service::new("risk"),
            reference,
        }
    }

    pub fn register_listener(&mut self, listener: Box<dyn Listener<Pv01<Bond>>>) {
        self.store.register_listener(listener);
    }

    pub fn get(&self, product_id: &str) -> Option<&Pv01<Bond>> {
        self.store.get(product_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Recompute the product's risk from its new position
    pub fn add_position(&mut self, position: &Position) -> Result<(), ServiceError> {
        let pv01 = self.reference.pv01(position.product.product_id.as_str())?;
        self.store
            .ingest(Pv01::new(position.product.clone(), pv01, position.aggregate()))
    }

    /// Quantity-weighted PV01 over the sector's products
    ///
    /// Zero PV01 when the sector's total quantity is zero. Every member
    /// must already carry risk.
    pub fn bucketed_risk(&self, sector: &BucketedSector) -> Result<Pv01<BucketedSector>, ReferenceError> {
        let mut weighted = Decimal::ZERO;
        let mut quantity = 0i64;
        for product in &sector.products {
            let id = product.product_id.as_str();
            let risk = self
                .store
                .get(id)
                .ok_or_else(|| ReferenceError::not_found("risk", id))?;
            weighted += risk.total();
            quantity += risk.quantity;
        }

        let pv01 = if quantity == 0 {
            Decimal::ZERO
        } else {
            weighted / Decimal::from(quantity)
        };
        Ok(Pv01::new(sector.clone(), pv01, quantity))
    }
}

/// Feeds position updates into risk
pub struct RiskListener {
    service: Shared<RiskService>,
}

impl RiskListener {
    pub fn new(service: Shared<RiskService>) -> Self {
        Self { service }
    }
}

impl Listener<Position> for RiskListener {
    fn on_add(&mut self, position: &Position) -> Result<(), ServiceError> {
        self.service.borrow_mut().add_position(position)
    }
}
