//! # Sale Ledger
//!
//! The in-progress sale.
//!
//! ## Ledger Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator Action          Register Command         Ledger Change        │
//! │  ───────────────          ────────────────         ─────────────        │
//! │                                                                         │
//! │  Scan label ─────────────► Scan ─────────────────► items.push(item)     │
//! │                                                                         │
//! │  Click 🗑 on row 2 ───────► RemoveItem{2} ────────► items.remove(2)      │
//! │                                                                         │
//! │  Finalize ───────────────► FinalizeSale ─────────► items.clear()        │
//! │                            (only after history                          │
//! │                             persisted)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike a product cart, scanning the same cut twice makes two rows: each
//! row is a separately weighed piece.

use crate::error::LedgerError;
use crate::money::{Money, Weight};
use crate::types::LineItem;

/// Ordered line items of the current sale.
///
/// ## Invariants
/// - Insertion order is preserved, removal keeps the relative order
/// - The total is never cached; [`SaleLedger::total`] sums the subtotals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleLedger {
    items: Vec<LineItem>,
}

impl SaleLedger {
    pub fn new() -> Self {
        SaleLedger::default()
    }

    /// Appends an item. Returns its index.
    pub fn append(&mut self, item: LineItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Removes the item at `index`.
    ///
    /// ## Returns
    /// - `Ok(item)` with the removed item
    /// - `Err(IndexOutOfRange)` with the ledger untouched
    pub fn remove_at(&mut self, index: usize) -> Result<LineItem, LedgerError> {
        if index >= self.items.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }

        Ok(self.items.remove(index))
    }

    /// Sum of all subtotals, recomputed on every call.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> Weight {
        self.items.iter().map(LineItem::weight).sum()
    }

    /// Empties the ledger. Reserved for the finalize protocol.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(name: &str, grams: i64, cents_per_kg: i64) -> LineItem {
        LineItem::new(
            name,
            Weight::from_grams(grams),
            Money::from_cents(cents_per_kg),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        )
    }

    fn ledger() -> SaleLedger {
        let mut ledger = SaleLedger::new();
        ledger.append(item("Lombinho", 1200, 3990)); // 47.88
        ledger.append(item("Fato", 500, 2800)); // 14.00
        ledger.append(item("Rins", 333, 2000)); // 6.66
        ledger
    }

    #[test]
    fn test_append_returns_index_and_keeps_order() {
        let mut ledger = ledger();
        let index = ledger.append(item("Lombinho", 1200, 3990));

        assert_eq!(index, 3);
        let names: Vec<&str> = ledger.items().iter().map(LineItem::product_name).collect();
        assert_eq!(names, vec!["Lombinho", "Fato", "Rins", "Lombinho"]);
    }

    #[test]
    fn test_total_sums_subtotals() {
        let ledger = ledger();
        assert_eq!(ledger.total(), Money::from_cents(4788 + 1400 + 666));
        assert_eq!(ledger.total_weight(), Weight::from_grams(2033));
        assert_eq!(SaleLedger::new().total(), Money::zero());
    }

    #[test]
    fn test_remove_then_total_reflects_removal() {
        let mut ledger = ledger();
        let before = ledger.total();

        let removed = ledger.remove_at(1).unwrap();

        assert_eq!(removed.product_name(), "Fato");
        assert_eq!(ledger.total(), before - removed.subtotal());
        let names: Vec<&str> = ledger.items().iter().map(LineItem::product_name).collect();
        assert_eq!(names, vec!["Lombinho", "Rins"]);
    }

    #[test]
    fn test_remove_out_of_range_has_no_effect() {
        let mut ledger = ledger();
        let before = ledger.clone();

        let err = ledger.remove_at(3).unwrap_err();

        assert_eq!(err, LedgerError::IndexOutOfRange { index: 3, len: 3 });
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_clear() {
        let mut ledger = ledger();
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total(), Money::zero());
    }
}
