//! # CSV History File
//!
//! Every finalized line, one row each, in the line-item layout of
//! [`crate::export`]. Saves rewrite the file atomically, so a failed
//! finalize never leaves a half-written sale behind.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use cleaver_core::{HistoryPersistence, LineItem, PersistenceError};

use crate::error::{DbError, DbResult};
use crate::export::{read_line_items, write_line_items};
use crate::files::write_atomic;

/// Sales history persisted as a CSV file.
#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvHistoryStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every line. A missing file is an empty history.
    pub fn read(&self) -> DbResult<Vec<LineItem>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "History file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(DbError::io(&self.path, e)),
        };

        let source = self.path.display().to_string();
        let items = read_line_items(BufReader::new(file), &source)?;
        debug!(path = %source, lines = items.len(), "Read history file");
        Ok(items)
    }

    /// Rewrites the whole file.
    pub fn write(&self, history: &[LineItem]) -> DbResult<()> {
        write_atomic(&self.path, |out| write_line_items(out, history))?;
        debug!(path = %self.path.display(), lines = history.len(), "Wrote history file");
        Ok(())
    }
}

impl HistoryPersistence for CsvHistoryStore {
    fn load(&self) -> Result<Vec<LineItem>, PersistenceError> {
        self.read().map_err(|e| PersistenceError::load("history", e))
    }

    fn save(&self, history: &[LineItem]) -> Result<(), PersistenceError> {
        self.write(history)
            .map_err(|e| PersistenceError::save("history", e))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cleaver_core::{Money, Weight};
    use std::fs;

    fn item(name: &str, grams: i64, cents: i64) -> LineItem {
        LineItem::new(
            name,
            Weight::from_grams(grams),
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        )
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::new(dir.path().join("history.csv"));

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_rewrites_full_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::new(dir.path().join("history.csv"));

        let first = vec![item("Lombinho", 1200, 3990)];
        store.append(&first, &first).unwrap();

        let both = vec![item("Lombinho", 1200, 3990), item("Fato", 500, 2800)];
        store.append(&both, &both[1..]).unwrap();

        assert_eq!(store.load().unwrap(), both);
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_corrupt_history_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvHistoryStore::new(dir.path().join("history.csv"));
        fs::write(
            store.path(),
            "product,weight_kg,price_per_kg,subtotal,date\nFato,0.5,28.00,14.00,17/10/2026\n",
        )
        .unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().starts_with("Failed to load history"));
    }
}
