//! Feed line helpers shared by the per-domain decoders
//!
//! Fields are comma-separated with no quoting. Each decoder checks the
//! field count before touching any field.

use rust_decimal::Decimal;
use std::str::FromStr;
use types::errors::RecordError;

/// Split `line` on commas and require exactly `expected` fields
pub fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, RecordError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(RecordError::FieldCount {
            expected,
            actual: fields.len(),
            line: line.to_string(),
        });
    }
    Ok(fields)
}

/// Like `split_fields`, but tolerates one trailing empty field
pub fn split_fields_lenient(line: &str, expected: usize) -> Result<Vec<&str>, RecordError> {
    let mut fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() == expected + 1 && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.len() != expected {
        return Err(RecordError::FieldCount {
            expected,
            actual: fields.len(),
            line: line.to_string(),
        });
    }
    Ok(fields)
}

pub fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, RecordError> {
    Decimal::from_str(value).map_err(|_| RecordError::invalid(field, value))
}

pub fn parse_quantity(field: &'static str, value: &str) -> Result<i64, RecordError> {
    value.parse().map_err(|_| RecordError::invalid(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields_exact() {
        assert_eq!(split_fields("a,b,c", 3).unwrap(), vec!["a", "b", "c"]);
        assert!(matches!(
            split_fields("a,b", 3),
            Err(RecordError::FieldCount {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_lenient_drops_one_trailing_empty_field() {
        assert_eq!(
            split_fields_lenient("0,91282CAX9,BUY,", 3).unwrap(),
            vec!["0", "91282CAX9", "BUY"]
        );
        assert_eq!(split_fields_lenient("0,91282CAX9,BUY", 3).unwrap().len(), 3);
        assert!(split_fields_lenient("0,91282CAX9,BUY,x", 3).is_err());
        assert!(split_fields_lenient("0,91282CAX9,BUY,,", 3).is_err());
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_decimal("price", "99.0").unwrap(), Decimal::from(99));
        assert!(parse_decimal("price", "ninety").is_err());
        assert_eq!(parse_quantity("quantity", "3000000").unwrap(), 3_000_000);
        assert!(parse_quantity("quantity", "3e6").is_err());
    }
}
