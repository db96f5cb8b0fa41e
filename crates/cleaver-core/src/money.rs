//! # Money and Weight
//!
//! Fixed-point quantities for the register.
//!
//! ## Why Integers?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    39.90 × 1.2 in f64  = 47.879999999999995                             │
//! │    round(…, 2)         = 47.88 (today), 47.87 (after enough sums)       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer cents and integer grams                          │
//! │    3990 cents × 1200 g = 4_788_000 milli-cents                          │
//! │    (4_788_000 + 500) / 1000 = 4788 cents = 47.88                        │
//! │                                                                         │
//! │  A scale prints grams, so a weight in grams IS the 3-decimal kg value.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cleaver_core::money::{Money, Weight};
//!
//! let price = Money::parse("39.90").unwrap();
//! let weight = Weight::parse_kg("1.2").unwrap();
//!
//! assert_eq!(weight.grams(), 1200);
//! assert_eq!(price.for_weight(weight).cents(), 4788);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::error::ValidationError;
use crate::validation::ValidationResult;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (the smallest currency unit).
///
/// Prices per kilogram, line subtotals and sale totals all use this type.
/// The currency symbol is a presentation concern and is not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use cleaver_core::money::Money;
    ///
    /// let price = Money::from_cents(3990); // 39.90 per kg
    /// assert_eq!(price.cents(), 3990);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount typed by the operator.
    ///
    /// Accepts `.` or `,` as the decimal separator and at most two decimal
    /// places. Sign and range checks belong to the caller
    /// (see [`crate::validation::validate_price`]).
    ///
    /// ## Example
    /// ```rust
    /// use cleaver_core::money::Money;
    ///
    /// assert_eq!(Money::parse("42.5").unwrap().cents(), 4250);
    /// assert_eq!(Money::parse("19,90").unwrap().cents(), 1990);
    /// assert!(Money::parse("1.999").is_err());
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> ValidationResult<Self> {
        parse_scaled("price", input, 2, false).map(Money)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Prices a weight at this per-kilogram rate.
    ///
    /// `round(price × kg, 2)`, rounding half away from zero on the exact
    /// product. Uses i128 so no realistic price or weight can overflow.
    ///
    /// ## Example
    /// ```rust
    /// use cleaver_core::money::{Money, Weight};
    ///
    /// // 16.00/kg × 1.234 kg = 19.744 → 19.74
    /// let subtotal = Money::from_cents(1600).for_weight(Weight::from_grams(1234));
    /// assert_eq!(subtotal.cents(), 1974);
    /// ```
    pub fn for_weight(&self, weight: Weight) -> Money {
        let milli_cents = self.0 as i128 * weight.grams() as i128;
        let cents = if milli_cents >= 0 {
            (milli_cents + 500) / 1000
        } else {
            (milli_cents - 500) / 1000
        };
        Money(cents as i64)
    }
}

/// Plain decimal rendering (`47.88`). Currency symbols are added by the
/// presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Weight Type
// =============================================================================

/// A weight in grams.
///
/// One gram is the third decimal place of a kilogram, so every `Weight`
/// is a kilogram value already rounded to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Weight(i64);

impl Weight {
    #[inline]
    pub const fn from_grams(grams: i64) -> Self {
        Weight(grams)
    }

    /// Parses a kilogram amount, rounding half-up to whole grams.
    ///
    /// ## Example
    /// ```rust
    /// use cleaver_core::money::Weight;
    ///
    /// assert_eq!(Weight::parse_kg("2.5").unwrap().grams(), 2500);
    /// assert_eq!(Weight::parse_kg("0,3456").unwrap().grams(), 346);
    /// assert_eq!(Weight::parse_kg("-1").unwrap().grams(), -1000);
    /// assert!(Weight::parse_kg("").is_err());
    /// ```
    pub fn parse_kg(input: &str) -> ValidationResult<Self> {
        parse_scaled("weight", input, 3, true).map(Weight)
    }

    #[inline]
    pub const fn grams(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Weight(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

/// Kilograms with three decimals (`1.234`).
impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let grams = self.0.abs();
        write!(f, "{}{}.{:03}", sign, grams / 1000, grams % 1000)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::zero()
    }
}

impl Add for Weight {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Weight(self.0 + other.0)
    }
}

impl AddAssign for Weight {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Self {
        iter.fold(Weight::zero(), Add::add)
    }
}

// =============================================================================
// Decimal Parsing
// =============================================================================

/// Longest integer part accepted, keeps the scaled value far inside i64.
const MAX_WHOLE_DIGITS: usize = 12;

/// Parses `[-]digits[(.|,)digits]` into an integer scaled by `10^scale`.
///
/// Extra fractional digits are rounded half-up when `round` is set and
/// rejected otherwise.
fn parse_scaled(field: &str, input: &str, scale: usize, round: bool) -> ValidationResult<i64> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let text = input.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (whole, frac) = match body.find(|c: char| c == '.' || c == ',') {
        Some(pos) => (&body[..pos], &body[pos + 1..]),
        None => (body, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("must be a decimal number"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("must be a decimal number"));
    }
    if whole.len() > MAX_WHOLE_DIGITS {
        return Err(invalid("too many digits"));
    }
    if frac.len() > scale && !round {
        return Err(invalid(&format!("at most {} decimal places", scale)));
    }

    let mut value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("must be a decimal number"))?
    };

    for position in 0..scale {
        let digit = frac.as_bytes().get(position).map_or(0, |b| (b - b'0') as i64);
        value = value * 10 + digit;
    }

    if let Some(next) = frac.as_bytes().get(scale) {
        if *next >= b'5' {
            value += 1;
        }
    }

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Unit Tests
// =============================================================================
