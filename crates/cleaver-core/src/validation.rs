//! # Validation Module
//!
//! Input validation for catalog and register operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / presentation                                           │
//! │  ├── Token splitting, trimming                                          │
//! │  └── Decimal parsing (Money::parse, Weight::parse_kg)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── product codes, names, prices, weights                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage                                                       │
//! │  ├── PRIMARY KEY / CHECK constraints (SQLite backend)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cleaver_core::money::Money;
//! use cleaver_core::validation::{validate_price, validate_product_code};
//!
//! validate_product_code("0001").unwrap();
//! validate_price(Money::from_cents(3990)).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::{Money, Weight};
use crate::{MAX_PRODUCT_NAME_LEN, PRODUCT_CODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Exactly 4 characters
/// - ASCII digits only (`"0001"`, not `"A001"` or `"٠٠٠١"`)
///
/// ## Example
/// ```rust
/// use cleaver_core::validation::validate_product_code;
///
/// assert!(validate_product_code("0017").is_ok());
/// assert!(validate_product_code("17").is_err());
/// assert!(validate_product_code("00A1").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() != PRODUCT_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: format!("must be exactly {} digits", PRODUCT_CODE_LEN),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
///
/// ## Example
/// ```rust
/// use cleaver_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Fraldinha").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price per kilogram.
///
/// ## Rules
/// - Must be strictly positive; the counter never sells meat for free
///
/// ## Example
/// ```rust
/// use cleaver_core::money::Money;
/// use cleaver_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1)).is_ok());
/// assert!(validate_price(Money::zero()).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a weight entered by hand.
///
/// ## Rules
/// - Must be at least one gram
pub fn validate_weight(weight: Weight) -> ValidationResult<()> {
    if !weight.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "weight".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Parsing
// =============================================================================

/// Parses a report date in `YYYY-MM-DD` form.
///
/// ## Example
/// ```rust
/// use cleaver_core::validation::parse_report_date;
///
/// assert!(parse_report_date("2026-10-17").is_ok());
/// assert!(parse_report_date("17/10/2026").is_err());
/// ```
pub fn parse_report_date(input: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
