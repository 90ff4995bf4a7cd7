//! Bond products and reference data
//!
//! The desk trades the on-the-run US Treasury curve. `BondReference` is the
//! single source of static product data: every record built from a feed
//! line resolves its CUSIP here, and risk reads its PV01 stand-ins from it.
//! It is constructed once at startup and shared by `Arc`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::ReferenceError;
use crate::ids::ProductId;

/// Identifier scheme of a bond product; the desk only trades by CUSIP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BondIdType {
    Cusip,
}

/// A bond product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub product_id: ProductId,
    pub id_type: BondIdType,
    pub ticker: String,
    pub coupon: Decimal,
    pub maturity: NaiveDate,
}

impl Bond {
    pub fn new(
        product_id: ProductId,
        id_type: BondIdType,
        ticker: impl Into<String>,
        coupon: Decimal,
        maturity: NaiveDate,
    ) -> Self {
        Self {
            product_id,
            id_type,
            ticker: ticker.into(),
            coupon,
            maturity,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }
}

#[derive(Debug, Clone)]
struct ReferenceEntry {
    bond: Bond,
    pv01: Decimal,
}

/// Static product table: coupon, maturity and PV01 per product
#[derive(Debug, Clone, Default)]
pub struct BondReference {
    entries: BTreeMap<ProductId, ReferenceEntry>,
    /// Products in curve (tenor) order
    curve: Vec<ProductId>,
}

/// (CUSIP, coupon, maturity (y, m, d), PV01 stand-in); 2Y through 30Y
const TREASURIES: [(&str, i64, (i32, u32, u32), i64); 7] = [
    ("91282CAX9", 125, (2022, 11, 30), 2),
    ("91282CBA80", 125, (2023, 12, 15), 3),
    ("91282CAZ4", 375, (2025, 11, 30), 5),
    ("91282CAY7", 625, (2027, 11, 30), 7),
    ("91282CAV3", 875, (2030, 11, 15), 10),
    ("912810ST6", 1375, (2040, 11, 15), 20),
    ("912810SS8", 1625, (2050, 11, 15), 30),
];

impl BondReference {
    /// Empty reference table
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven on-the-run treasuries traded by the desk
    pub fn treasuries() -> Self {
        let mut reference = Self::new();
        for (cusip, coupon_bp100, (year, month, day), pv01_cents) in TREASURIES {
            // Table dates are valid calendar dates
            if let Some(maturity) = NaiveDate::from_ymd_opt(year, month, day) {
                reference.insert(
                    Bond::new(
                        ProductId::new(cusip),
                        BondIdType::Cusip,
                        "T",
                        Decimal::new(coupon_bp100, 5),
                        maturity,
                    ),
                    Decimal::new(pv01_cents, 2),
                );
            }
        }
        reference
    }

    /// Add or replace a product
    pub fn insert(&mut self, bond: Bond, pv01: Decimal) {
        let id = bond.product_id.clone();
        if !self.entries.contains_key(&id) {
            self.curve.push(id.clone());
        }
        self.entries.insert(id, ReferenceEntry { bond, pv01 });
    }

    fn entry(&self, product_id: &str) -> Result<&ReferenceEntry, ReferenceError> {
        self.entries
            .get(&ProductId::new(product_id))
            .ok_or_else(|| ReferenceError::unknown(product_id))
    }

    /// Look up a bond by CUSIP
    pub fn bond(&self, product_id: &str) -> Result<Bond, ReferenceError> {
        self.entry(product_id).map(|e| e.bond.clone())
    }

    pub fn coupon(&self, product_id: &str) -> Result<Decimal, ReferenceError> {
        self.entry(product_id).map(|e| e.bond.coupon)
    }

    pub fn maturity(&self, product_id: &str) -> Result<NaiveDate, ReferenceError> {
        self.entry(product_id).map(|e| e.bond.maturity)
    }

    /// PV01 stand-in for a product
    pub fn pv01(&self, product_id: &str) -> Result<Decimal, ReferenceError> {
        self.entry(product_id).map(|e| e.pv01)
    }

    /// All known products in curve order
    pub fn product_ids(&self) -> &[ProductId] {
        &self.curve
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.entries.contains_key(&ProductId::new(product_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
