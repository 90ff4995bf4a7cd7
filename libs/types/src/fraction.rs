//! Treasury fractional price notation
//!
//! Prices travel as `I-xyz`: `I` is the integer handle, `xy` the 32nds
//! (00 to 31) and `z` the 256ths remainder (0 to 7), so that
//! `price = I + xy/32 + z/256`. A trailing `+` in place of `z` means half
//! a 32nd, i.e. `4`. A zero remainder is omitted when encoding
//! (`100-16` rather than `100-160`); both shapes decode.
//!
//! The notation resolves 1/256 of a point. Encoding floors to that grid.

use rust_decimal::Decimal;

use crate::errors::FractionError;

/// Number of 256ths in one point of price
pub const TICKS_PER_POINT: i64 = 256;

/// Number of 256ths in one 32nd
const TICKS_PER_32ND: i64 = 8;

/// Smallest price increment the notation can carry
pub fn tick_size() -> Decimal {
    Decimal::ONE / Decimal::from(TICKS_PER_POINT)
}

/// Encode a price into `I-xy[z]` notation, flooring to the 1/256 grid.
pub fn to_fractional(price: Decimal) -> String {
    let ticks = (price * Decimal::from(TICKS_PER_POINT)).floor().mantissa();
    let handle = ticks.div_euclid(TICKS_PER_POINT as i128);
    let within = ticks.rem_euclid(TICKS_PER_POINT as i128);
    let thirty_seconds = within / TICKS_PER_32ND as i128;
    let remainder = within % TICKS_PER_32ND as i128;

    if remainder == 0 {
        format!("{}-{:02}", handle, thirty_seconds)
    } else {
        format!("{}-{:02}{}", handle, thirty_seconds, remainder)
    }
}

/// Decode an `I-xy`, `I-xyz` or `I-xy+` price.
pub fn from_fractional(text: &str) -> Result<Decimal, FractionError> {
    let (handle, fraction) = text
        .split_once('-')
        .ok_or_else(|| FractionError::MissingSeparator(text.to_string()))?;

    if handle.is_empty() || !handle.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FractionError::InvalidHandle(text.to_string()));
    }
    let handle: i64 = handle
        .parse()
        .map_err(|_| FractionError::InvalidHandle(text.to_string()))?;

    let digits: Vec<char> = fraction.chars().collect();
    if !(2..=3).contains(&digits.len()) {
        return Err(FractionError::InvalidThirtySeconds {
            price: text.to_string(),
            reason: format!("expected 2 or 3 characters after '-', got {}", digits.len()),
        });
    }

    let thirty_seconds = match (digits[0].to_digit(10), digits[1].to_digit(10)) {
        (Some(tens), Some(units)) => tens * 10 + units,
        _ => {
            return Err(FractionError::InvalidThirtySeconds {
                price: text.to_string(),
                reason: "non-digit character".to_string(),
            })
        }
    };
    if thirty_seconds > 31 {
        return Err(FractionError::InvalidThirtySeconds {
            price: text.to_string(),
            reason: format!("{} is out of range 00-31", thirty_seconds),
        });
    }

    let remainder = match digits.get(2) {
        None => 0,
        Some('+') => 4,
        Some(&c) => c
            .to_digit(10)
            .filter(|d| *d < TICKS_PER_32ND as u32)
            .ok_or(FractionError::InvalidRemainder {
                price: text.to_string(),
                digit: c,
            })?,
    };

    let ticks = handle * TICKS_PER_POINT
        + i64::from(thirty_seconds) * TICKS_PER_32ND
        + i64::from(remainder);
    Ok(Decimal::from(ticks) / Decimal::from(TICKS_PER_POINT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_encode_half_point_omits_zero_remainder() {
        assert_eq!(to_fractional(dec("100.5")), "100-16");
    }

    #[test]
    fn test_decode_three_digit_fraction() {
        assert_eq!(from_fractional("100-160").unwrap(), dec("100.5"));
    }

    #[test]
    fn test_plus_decodes_as_four() {
        assert_eq!(
            from_fractional("99-28+").unwrap(),
            from_fractional("99-284").unwrap()
        );
        assert_eq!(from_fractional("99-284").unwrap(), dec("99.890625"));
    }

    #[test]
    fn test_encode_with_remainder() {
        // 99 + 1/256
        assert_eq!(to_fractional(dec("99.00390625")), "99-001");
        // 101 - 1/256 = 100 + 31/32 + 7/256
        assert_eq!(to_fractional(dec("100.99609375")), "100-317");
    }

    #[test]
    fn test_encode_floors_off_grid_prices() {
        // 1/512 is below the notation's resolution
        assert_eq!(to_fractional(dec("99.001953125")), "99-00");
        assert_eq!(to_fractional(dec("99")), "99-00");
    }

    #[test]
    fn test_decode_two_digit_handle() {
        assert_eq!(from_fractional("99-000").unwrap(), dec("99"));
        assert_eq!(from_fractional("99-317").unwrap(), dec("99.99609375"));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(
            from_fractional("99.5"),
            Err(FractionError::MissingSeparator(_))
        ));
        assert!(matches!(
            from_fractional("-160"),
            Err(FractionError::InvalidHandle(_))
        ));
        assert!(matches!(
            from_fractional("99-3"),
            Err(FractionError::InvalidThirtySeconds { .. })
        ));
        assert!(matches!(
            from_fractional("99-320"),
            Err(FractionError::InvalidThirtySeconds { .. })
        ));
        assert!(matches!(
            from_fractional("99-158"),
            Err(FractionError::InvalidRemainder { digit: '8', .. })
        ));
        assert!(matches!(
            from_fractional("99-1x0"),
            Err(FractionError::InvalidThirtySeconds { .. })
        ));
    }

    #[test]
    fn test_tick_size() {
        assert_eq!(tick_size(), dec("0.00390625"));
    }

    proptest! {
        #[test]
        fn prop_grid_prices_round_trip(handle in 0i64..1000, ticks in 0i64..256) {
            let price = Decimal::from(handle) + Decimal::from(ticks) / Decimal::from(256);
            let decoded = from_fractional(&to_fractional(price)).unwrap();
            prop_assert_eq!(decoded, price);
        }

        #[test]
        fn prop_encode_is_within_one_tick(units in 0i64..200_000_000) {
            // Arbitrary prices with six decimal places in [0, 200)
            let price = Decimal::new(units, 6);
            let decoded = from_fractional(&to_fractional(price)).unwrap();
            prop_assert!(decoded <= price);
            prop_assert!(price - decoded < tick_size());
        }
    }
}
