//! # Daily Report
//!
//! Aggregates one day of history into per-product totals.
//!
//! ```text
//! history ──► filter(date == D) ──► group by product_name ──► rows (A→Z)
//!
//!   Lombinho 1.200  ┐
//!   Fato     0.500  ├──► Fato      0.500  14.00
//!   Lombinho 0.800  ┘    Lombinho  2.000  79.80
//! ```
//!
//! Grouping is by the name snapshotted on the line item, so a product
//! renamed or deleted later still reports under the name it was sold as.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::money::{Money, Weight};
use crate::types::{DailyReportRow, LineItem};

/// Per-product totals for `date`, ordered by product name.
///
/// An empty day yields an empty vector, never an error.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use cleaver_core::money::{Money, Weight};
/// use cleaver_core::{report, LineItem};
///
/// let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
/// let history = vec![
///     LineItem::new("Lombinho", Weight::from_grams(1200), Money::from_cents(3990), day),
///     LineItem::new("Lombinho", Weight::from_grams(800), Money::from_cents(3990), day),
/// ];
///
/// let rows = report::generate(&history, day);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].total_weight, Weight::from_grams(2000));
/// ```
pub fn generate<'a>(
    history: impl IntoIterator<Item = &'a LineItem>,
    date: NaiveDate,
) -> Vec<DailyReportRow> {
    let mut totals: BTreeMap<&str, (Weight, Money)> = BTreeMap::new();

    for item in history.into_iter().filter(|item| item.date() == date) {
        let entry = totals.entry(item.product_name()).or_default();
        entry.0 += item.weight();
        entry.1 += item.subtotal();
    }

    totals
        .into_iter()
        .map(|(name, (weight, revenue))| DailyReportRow {
            product_name: name.to_string(),
            total_weight: weight,
            total_revenue: revenue,
        })
        .collect()
}

/// A daily report with its grand totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub rows: Vec<DailyReportRow>,
    /// Number of line items sold that day.
    pub line_count: usize,
    #[serde(rename = "total_weight_grams")]
    pub total_weight: Weight,
    #[serde(rename = "total_revenue_cents")]
    pub total_revenue: Money,
}

impl DailyReport {
    pub fn build<'a>(history: impl IntoIterator<Item = &'a LineItem> + Clone, date: NaiveDate) -> Self {
        let line_count = history
            .clone()
            .into_iter()
            .filter(|item| item.date() == date)
            .count();
        let rows = generate(history, date);

        DailyReport {
            date,
            line_count,
            total_weight: rows.iter().map(|row| row.total_weight).sum(),
            total_revenue: rows.iter().map(|row| row.total_revenue).sum(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
