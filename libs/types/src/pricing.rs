//! Internal mid/spread prices

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bond::Bond;
use crate::record::{Record, WireEncode};

/// Mid price and bid/offer spread for a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub product: Bond,
    pub mid: Decimal,
    pub bid_offer_spread: Decimal,
}

impl Price {
    pub fn new(product: Bond, mid: Decimal, bid_offer_spread: Decimal) -> Self {
        Self {
            product,
            mid,
            bid_offer_spread,
        }
    }

    /// mid - spread/2
    pub fn bid(&self) -> Decimal {
        self.mid - self.bid_offer_spread / Decimal::TWO
    }

    /// mid + spread/2
    pub fn offer(&self) -> Decimal {
        self.mid + self.bid_offer_spread / Decimal::TWO
    }
}

impl Record for Price {
    fn identifier(&self) -> &str {
        self.product.product_id.as_str()
    }
}

/// GUI line body: `productId,mid,spread`
impl WireEncode for Price {
    fn to_wire(&self) -> String {
        format!(
            "{},{:.6},{:.6}",
            self.product.product_id, self.mid, self.bid_offer_spread
        )
    }
}
