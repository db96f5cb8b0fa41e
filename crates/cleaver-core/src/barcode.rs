//! # Barcode Decoder
//!
//! Turns a scanned string into a priced [`LineItem`] or a classified
//! rejection.
//!
//! ## Accepted Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Weight-embedded (scale label, 13 digits, leading "2")                 │
//! │                                                                         │
//! │     2  0  0 0 1 0  0 1 2 3 4  0 5                                       │
//! │     ─  ─  ───────  ─────────  ───                                       │
//! │     │  │  code     grams      check digits (not validated)              │
//! │     │  └─ offset 1 (ignored)                                            │
//! │     └──── variable-measure prefix                                       │
//! │                                                                         │
//! │     offsets 2..6 = "0010", 6..11 = "01234" → 1.234 kg                   │
//! │                                                                         │
//! │  Fixed code (4 digits, must be in the catalog)                          │
//! │                                                                         │
//! │     0 0 0 1  + manual weight typed by the operator                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding is a pure function of `(raw, manual_weight, catalog, date)`.
//! Repeated identical scans are NOT deduplicated here; that is a caller
//! policy.

use chrono::NaiveDate;

use crate::catalog::Catalog;
use crate::error::DecodeError;
use crate::money::Weight;
use crate::types::LineItem;
use crate::validation::validate_weight;
use crate::{PRODUCT_CODE_LEN, WEIGHT_BARCODE_LEN, WEIGHT_BARCODE_PREFIX};

/// Offsets of the product code inside a weight-embedded barcode.
const CODE_RANGE: std::ops::Range<usize> = 2..6;

/// Offsets of the weight in grams inside a weight-embedded barcode.
const GRAMS_RANGE: std::ops::Range<usize> = 6..11;

/// A scanned string after shape classification, before catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedCode<'a> {
    /// Scale label carrying both the code and the weight.
    WeightEmbedded { code: &'a str, weight: Weight },
    /// Bare product code; weight comes from the operator.
    Fixed { code: &'a str },
}

impl<'a> ScannedCode<'a> {
    pub fn code(&self) -> &'a str {
        match self {
            ScannedCode::WeightEmbedded { code, .. } | ScannedCode::Fixed { code } => code,
        }
    }
}

/// Classifies a raw scan by shape.
///
/// Lengths and offsets count characters, not bytes. A 4-character string
/// is a fixed code only if the catalog knows it; otherwise it is an
/// unsupported format, like any other shape.
pub fn classify<'a>(raw: &'a str, catalog: &Catalog) -> Result<ScannedCode<'a>, DecodeError> {
    let len = raw.chars().count();

    if len == WEIGHT_BARCODE_LEN && raw.starts_with(WEIGHT_BARCODE_PREFIX) {
        let code = digits_at(raw, CODE_RANGE).ok_or_else(|| malformed(raw, "product code is not numeric"))?;
        let grams = digits_at(raw, GRAMS_RANGE).ok_or_else(|| malformed(raw, "weight is not numeric"))?;

        // At most five digits, always fits.
        let grams: i64 = grams
            .parse()
            .map_err(|_| malformed(raw, "weight is not numeric"))?;
        if grams == 0 {
            return Err(malformed(raw, "weight is zero"));
        }

        return Ok(ScannedCode::WeightEmbedded {
            code,
            weight: Weight::from_grams(grams),
        });
    }

    if len == PRODUCT_CODE_LEN && catalog.contains(raw) {
        return Ok(ScannedCode::Fixed { code: raw });
    }

    Err(DecodeError::UnsupportedBarcodeFormat {
        raw: raw.to_string(),
    })
}

/// Decodes a scan into a line item dated `date`.
///
/// ## Decision Flow
/// ```text
/// raw ──► classify ──┬── WeightEmbedded{code, grams} ─┐
///                    ├── Fixed{code} + manual weight ─┤ (weight > 0?)
///                    └── UnsupportedBarcodeFormat     │
///                                                     ▼
///                                       catalog.lookup(code)
///                                          │           │
///                                   UnknownProduct   LineItem{subtotal =
///                                                     round(price × kg, 2)}
/// ```
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use cleaver_core::barcode::decode;
/// use cleaver_core::{Catalog, Money, Weight};
///
/// let mut catalog = Catalog::new();
/// catalog.add("0010", "Baço", Money::from_cents(1600)).unwrap();
/// let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
///
/// let item = decode("2000100123405", Weight::zero(), &catalog, today).unwrap();
/// assert_eq!(item.weight().grams(), 1234);
/// assert_eq!(item.subtotal().cents(), 1974);
/// ```
pub fn decode(
    raw: &str,
    manual_weight: Weight,
    catalog: &Catalog,
    date: NaiveDate,
) -> Result<LineItem, DecodeError> {
    let scanned = classify(raw, catalog)?;

    let weight = match scanned {
        ScannedCode::WeightEmbedded { weight, .. } => weight,
        ScannedCode::Fixed { .. } => {
            validate_weight(manual_weight).map_err(|_| DecodeError::InvalidManualWeight {
                weight: manual_weight,
            })?;
            manual_weight
        }
    };

    let product = catalog
        .lookup(scanned.code())
        .ok_or_else(|| DecodeError::UnknownProduct {
            code: scanned.code().to_string(),
        })?;

    Ok(LineItem::for_product(product, weight, date))
}

/// Returns the characters at `range` (character offsets) if they are all
/// ASCII digits.
fn digits_at(raw: &str, range: std::ops::Range<usize>) -> Option<&str> {
    let mut offsets = raw
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(raw.len()));
    let start = offsets.nth(range.start)?;
    let end = offsets.nth(range.len().checked_sub(1)?)?;

    raw.get(start..end)
        .filter(|part| part.bytes().all(|b| b.is_ascii_digit()))
}

fn malformed(raw: &str, reason: &str) -> DecodeError {
    DecodeError::MalformedWeightCode {
        raw: raw.to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
