//! Customer inquiries
//!
//! Lifecycle: `RECEIVED -> QUOTED -> DONE`, with `REJECTED` for an inquiry
//! seen in any state the desk does not handle. Transitions produce a new
//! value through `with_state` / `with_price`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bond::Bond;
use crate::fraction::to_fractional;
use crate::order::Side;
use crate::record::{Record, WireEncode};

/// Inquiry state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryState {
    Received,
    Quoted,
    Done,
    Rejected,
    CustomerRejected,
}

impl InquiryState {
    /// Check if state is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InquiryState::Done | InquiryState::Rejected | InquiryState::CustomerRejected
        )
    }
}

impl fmt::Display for InquiryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InquiryState::Received => "RECEIVED",
            InquiryState::Quoted => "QUOTED",
            InquiryState::Done => "DONE",
            InquiryState::Rejected => "REJECTED",
            InquiryState::CustomerRejected => "CUSTOMER_REJECTED",
        };
        f.write_str(s)
    }
}

/// A customer inquiry for a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub inquiry_id: String,
    pub product: Bond,
    pub side: Side,
    pub quantity: i64,
    pub price: Decimal,
    pub state: InquiryState,
}

impl Inquiry {
    /// New inquiry as it arrives from a customer
    pub fn received(inquiry_id: impl Into<String>, product: Bond, side: Side) -> Self {
        Self {
            inquiry_id: inquiry_id.into(),
            product,
            side,
            quantity: 0,
            price: Decimal::ZERO,
            state: InquiryState::Received,
        }
    }

    pub fn with_state(mut self, state: InquiryState) -> Self {
        self.state = state;
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }
}

impl Record for Inquiry {
    fn identifier(&self) -> &str {
        &self.inquiry_id
    }
}

/// `productId,price,state`
impl WireEncode for Inquiry {
    fn to_wire(&self) -> String {
        format!(
            "{},{},{}",
            self.product.product_id,
            to_fractional(self.price),
            self.state
        )
    }
}
