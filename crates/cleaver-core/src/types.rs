//! # Domain Types
//!
//! Core domain types used throughout Cleaver.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │ DailyReportRow  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code "0001"    │──►│  product_name   │──►│  product_name   │       │
//! │  │  name           │   │  weight (g)     │   │  total_weight   │       │
//! │  │  price_per_kg   │   │  price_per_kg   │   │  total_revenue  │       │
//! │  └─────────────────┘   │  subtotal       │   └─────────────────┘       │
//! │                        │  date           │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` copies the product name and price at scan time. Later price
//! updates or product deletions never rewrite a sale or the history.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::{Money, Weight};
use crate::validation::{validate_product_code, ValidationResult};

// =============================================================================
// Product Code
// =============================================================================

/// A four-digit product code, e.g. `"0010"`.
///
/// The same code appears at offsets 2..6 of a scale barcode and is what the
/// operator types for fixed-code items.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct ProductCode(String);

impl ProductCode {
    /// Parses and validates a product code.
    ///
    /// ## Example
    /// ```rust
    /// use cleaver_core::ProductCode;
    ///
    /// assert_eq!(ProductCode::parse("0001").unwrap().as_str(), "0001");
    /// assert!(ProductCode::parse("1").is_err());
    /// ```
    pub fn parse(code: &str) -> ValidationResult<Self> {
        validate_product_code(code)?;
        Ok(ProductCode(code.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCode::parse(s)
    }
}

impl TryFrom<String> for ProductCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_product_code(&value)?;
        Ok(ProductCode(value))
    }
}

impl From<ProductCode> for String {
    fn from(code: ProductCode) -> Self {
        code.0
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A cut of meat sold by weight.
///
/// JSON: `{"code": "0001", "name": "Lombinho", "price_per_kg_cents": 3990}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Four-digit code, the product's identity.
    pub code: ProductCode,

    /// Display name shown to the operator and on receipts.
    pub name: String,

    /// Price per kilogram.
    #[serde(rename = "price_per_kg_cents")]
    pub price_per_kg: Money,
}

impl Product {
    pub fn new(code: ProductCode, name: impl Into<String>, price_per_kg: Money) -> Self {
        Product {
            code,
            name: name.into(),
            price_per_kg,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One weighed item of a sale.
///
/// ## Invariants
/// - `subtotal == round(weight × price_per_kg, 2)`, computed by [`LineItem::new`]
/// - Immutable: fields are private; a correction is a removal plus a new scan
///
/// JSON fields follow export order with integer units in the name:
/// `product_name, weight_grams, price_per_kg_cents, subtotal_cents, date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    product_name: String,
    #[serde(rename = "weight_grams")]
    weight: Weight,
    #[serde(rename = "price_per_kg_cents")]
    price_per_kg: Money,
    #[serde(rename = "subtotal_cents")]
    subtotal: Money,
    date: NaiveDate,
}

impl LineItem {
    /// Creates a line item, computing the subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use cleaver_core::money::{Money, Weight};
    /// use cleaver_core::LineItem;
    ///
    /// let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    /// let item = LineItem::new("Lombinho", Weight::from_grams(1200), Money::from_cents(3990), date);
    /// assert_eq!(item.subtotal().cents(), 4788);
    /// ```
    pub fn new(
        product_name: impl Into<String>,
        weight: Weight,
        price_per_kg: Money,
        date: NaiveDate,
    ) -> Self {
        LineItem {
            product_name: product_name.into(),
            weight,
            price_per_kg,
            subtotal: price_per_kg.for_weight(weight),
            date,
        }
    }

    /// Creates a line item priced from a catalog product.
    pub fn for_product(product: &Product, weight: Weight, date: NaiveDate) -> Self {
        LineItem::new(product.name.clone(), weight, product.price_per_kg, date)
    }

    #[inline]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    #[inline]
    pub fn weight(&self) -> Weight {
        self.weight
    }

    #[inline]
    pub fn price_per_kg(&self) -> Money {
        self.price_per_kg
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// The calendar date the item was scanned.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

// =============================================================================
// Daily Report Row
// =============================================================================

/// Total weight (and revenue) of one product sold on one day.
///
/// JSON: `product_name, total_weight_grams, total_revenue_cents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReportRow {
    pub product_name: String,
    #[serde(rename = "total_weight_grams")]
    pub total_weight: Weight,
    #[serde(rename = "total_revenue_cents")]
    pub total_revenue: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
