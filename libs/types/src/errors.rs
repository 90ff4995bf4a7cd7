//! Error types for records and reference data
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Malformed fractional price string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FractionError {
    #[error("Missing '-' separator in fractional price: {0}")]
    MissingSeparator(String),

    #[error("Invalid integer handle in fractional price: {0}")]
    InvalidHandle(String),

    #[error("Invalid 32nds in fractional price {price}: {reason}")]
    InvalidThirtySeconds { price: String, reason: String },

    #[error("Invalid 256ths digit in fractional price {price}: {digit}")]
    InvalidRemainder { price: String, digit: char },
}

/// Bond reference lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Unknown product: {product_id}")]
    UnknownProduct { product_id: String },

    #[error("No {kind} recorded for product: {product_id}")]
    NotFound { kind: String, product_id: String },
}

impl ReferenceError {
    pub fn unknown(product_id: impl Into<String>) -> Self {
        Self::UnknownProduct {
            product_id: product_id.into(),
        }
    }

    pub fn not_found(kind: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            product_id: product_id.into(),
        }
    }
}

/// Feed line errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Malformed line: expected {expected} fields, got {actual}: {line}")]
    FieldCount {
        expected: usize,
        actual: usize,
        line: String,
    },

    #[error("Invalid {field}: {value}")]
    InvalidField { field: String, value: String },

    #[error("Fraction error: {0}")]
    Fraction(#[from] FractionError),

    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),
}

impl RecordError {
    pub fn invalid(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }
}
