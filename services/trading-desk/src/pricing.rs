//! Internal prices
//!
//! Price feed line: `productId,I-xyz,d` where the mid is in fractional
//! notation (a trailing `+` meaning 4) and the bid/offer spread is `d/128`.

use rust_decimal::Decimal;
use std::sync::Arc;

use soa::{LineDecoder, Service};
use types::bond::BondReference;
use types::errors::RecordError;
use types::fraction::from_fractional;
use types::pricing::Price;

use crate::feeds::split_fields;

/// Latest price per product
pub type PricingService = Service<Price>;

/// Spread unit of the price feed: 1/128 of a point
const SPREAD_DENOMINATOR: u32 = 128;

pub struct PriceDecoder {
    reference: Arc<BondReference>,
}

impl PriceDecoder {
    pub fn new(reference: Arc<BondReference>) -> Self {
        Self { reference }
    }
}

impl LineDecoder for PriceDecoder {
    type Record = Price;

    fn decode(&self, line: &str) -> Result<Price, RecordError> {
        let fields = split_fields(line, 3)?;
        let bond = self.reference.bond(fields[0])?;
        let mid = from_fractional(fields[1])?;
        let spread = parse_spread(fields[2])?;
        Ok(Price::new(bond, mid, spread))
    }
}

fn parse_spread(field: &str) -> Result<Decimal, RecordError> {
    let mut chars = field.chars();
    match (chars.next().and_then(|c| c.to_digit(10)), chars.next()) {
        (Some(digit), None) => Ok(Decimal::from(digit) / Decimal::from(SPREAD_DENOMINATOR)),
        _ => Err(RecordError::invalid("spread", field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use types::errors::ReferenceError;

    fn decoder() -> PriceDecoder {
        PriceDecoder::new(Arc::new(BondReference::treasuries()))
    }

    #[test]
    fn test_decode_price_line() {
        let price = decoder().decode("91282CAX9,99-28+,2").unwrap();
        assert_eq!(price.product.product_id.as_str(), "91282CAX9");
        assert_eq!(price.mid, Decimal::from_str("99.890625").unwrap());
        assert_eq!(price.bid_offer_spread, Decimal::from_str("0.015625").unwrap());
    }

    #[test]
    fn test_decode_rejects_bad_spread() {
        assert!(matches!(
            decoder().decode("91282CAX9,99-000,x"),
            Err(RecordError::InvalidField { .. })
        ));
        assert!(decoder().decode("91282CAX9,99-000,12").is_err());
    }

    #[test]
    fn test_decode_unknown_product() {
        assert_eq!(
            decoder().decode("BOGUS,99-000,1").unwrap_err(),
            RecordError::Reference(ReferenceError::unknown("BOGUS"))
        );
    }

    #[test]
    fn test_decode_bad_fraction() {
        assert!(matches!(
            decoder().decode("91282CAX9,99.5,1"),
            Err(RecordError::Fraction(_))
        ));
    }
}
