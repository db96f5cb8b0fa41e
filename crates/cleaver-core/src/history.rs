//! # History Store
//!
//! Append-only record of finalized sales.
//!
//! ## Commit Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append_with(items, persist)                                           │
//! │                                                                         │
//! │  entries: [h0 h1 h2]                                                    │
//! │       │ extend                                                          │
//! │       ▼                                                                 │
//! │  entries: [h0 h1 h2 | s0 s1]                                            │
//! │       │ persist(all, new)                                               │
//! │       ├── Ok  ──► keep                                                  │
//! │       └── Err ──► truncate back to [h0 h1 h2], return Err               │
//! │                                                                         │
//! │  Nothing outside this call ever observes a half-committed sale.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::types::LineItem;

/// Finalized line items, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    entries: Vec<LineItem>,
}

impl HistoryStore {
    pub fn new() -> Self {
        HistoryStore::default()
    }

    /// Wraps previously persisted entries.
    pub fn from_entries(entries: Vec<LineItem>) -> Self {
        HistoryStore { entries }
    }

    /// Appends all items in memory.
    pub fn append(&mut self, items: impl IntoIterator<Item = LineItem>) {
        self.entries.extend(items);
    }

    /// Appends all items, then runs `persist` with the full history and the
    /// newly appended slice. If `persist` fails the append is undone.
    pub fn append_with<E>(
        &mut self,
        items: Vec<LineItem>,
        persist: impl FnOnce(&[LineItem], &[LineItem]) -> Result<(), E>,
    ) -> Result<(), E> {
        let committed = self.entries.len();
        self.entries.extend(items);

        let (all, new) = (&self.entries[..], &self.entries[committed..]);
        match persist(all, new) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.entries.truncate(committed);
                Err(err)
            }
        }
    }

    /// Items sold on `date`, in commit order.
    pub fn query_by_date(&self, date: NaiveDate) -> impl Iterator<Item = &LineItem> {
        self.entries.iter().filter(move |item| item.date() == date)
    }

    pub fn entries(&self) -> &[LineItem] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
