//! PV01 risk records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bond::Bond;
use crate::record::{Record, WireEncode};

/// PV01 of a quantity of some product (a bond or a sector)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pv01<T> {
    pub product: T,
    pub pv01: Decimal,
    pub quantity: i64,
}

impl<T> Pv01<T> {
    pub fn new(product: T, pv01: Decimal, quantity: i64) -> Self {
        Self {
            product,
            pv01,
            quantity,
        }
    }

    /// pv01 x quantity
    pub fn total(&self) -> Decimal {
        self.pv01 * Decimal::from(self.quantity)
    }
}

/// A named group of products whose risk is aggregated together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketedSector {
    pub name: String,
    pub products: Vec<Bond>,
}

impl BucketedSector {
    pub fn new(name: impl Into<String>, products: Vec<Bond>) -> Self {
        Self {
            name: name.into(),
            products,
        }
    }
}

impl Record for Pv01<Bond> {
    fn identifier(&self) -> &str {
        self.product.product_id.as_str()
    }
}

impl Record for Pv01<BucketedSector> {
    fn identifier(&self) -> &str {
        &self.product.name
    }
}

/// `productId,pv01*quantity`
impl WireEncode for Pv01<Bond> {
    fn to_wire(&self) -> String {
        format!("{},{:.6}", self.product.product_id, self.total())
    }
}
