//! Execution orders sent to a venue

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bond::Bond;
use crate::fraction::to_fractional;
use crate::order::{OrderType, PricingSide};
use crate::record::{Record, WireEncode};

/// An order that can be placed on an exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOrder {
    pub product: Bond,
    pub side: PricingSide,
    pub order_id: String,
    pub order_type: OrderType,
    pub price: Decimal,
    pub visible_quantity: i64,
    pub hidden_quantity: i64,
    pub parent_order_id: String,
    pub is_child_order: bool,
}

impl Record for ExecutionOrder {
    fn identifier(&self) -> &str {
        &self.order_id
    }
}

/// `productId,orderId,orderType,BUY|SELL,price,visible,hidden`
impl WireEncode for ExecutionOrder {
    fn to_wire(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.product.product_id,
            self.order_id,
            self.order_type,
            self.side.trade_side(),
            to_fractional(self.price),
            self.visible_quantity,
            self.hidden_quantity
        )
    }
}
