//! Two-way price streams published to the market

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bond::Bond;
use crate::fraction::to_fractional;
use crate::order::PricingSide;
use crate::record::{Record, WireEncode};

/// One side of a price stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceStreamOrder {
    pub price: Decimal,
    pub visible_quantity: i64,
    pub hidden_quantity: i64,
    pub side: PricingSide,
}

impl PriceStreamOrder {
    pub fn new(price: Decimal, visible_quantity: i64, hidden_quantity: i64, side: PricingSide) -> Self {
        Self {
            price,
            visible_quantity,
            hidden_quantity,
            side,
        }
    }
}

/// Bid and offer stream for a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceStream {
    pub product: Bond,
    pub bid_order: PriceStreamOrder,
    pub offer_order: PriceStreamOrder,
}

impl PriceStream {
    pub fn new(product: Bond, bid_order: PriceStreamOrder, offer_order: PriceStreamOrder) -> Self {
        Self {
            product,
            bid_order,
            offer_order,
        }
    }
}

impl Record for PriceStream {
    fn identifier(&self) -> &str {
        self.product.product_id.as_str()
    }
}

/// `productId,bid,offer` in fractional notation
impl WireEncode for PriceStream {
    fn to_wire(&self) -> String {
        format!(
            "{},{},{}",
            self.product.product_id,
            to_fractional(self.bid_order.price),
            to_fractional(self.offer_order.price)
        )
    }
}
