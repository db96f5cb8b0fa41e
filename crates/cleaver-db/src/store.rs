//! # Blocking SQLite Store
//!
//! Adapts the async repositories to the synchronous persistence traits of
//! cleaver-core.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Register (sync)                                                        │
//! │     │ history.append(&all, &sale)                                       │
//! │     ▼                                                                   │
//! │  SqliteStore                                                            │
//! │     │ runtime.block_on(...)    ← private current-thread runtime         │
//! │     ▼                                                                   │
//! │  SaleRepository::insert_sale(&sale)   (one transaction)                 │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  SQLite                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Never call these methods from inside another tokio runtime: `block_on`
//! panics there. Async callers should use [`Database`] directly.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use cleaver_core::{Catalog, CatalogPersistence, HistoryPersistence, LineItem, PersistenceError};

use crate::error::{DbError, DbResult};
use crate::pool::{Database, DbConfig};

/// Catalog and history in one SQLite database.
///
/// ## Usage
/// ```rust,ignore
/// let store = SqliteStore::open(DbConfig::new("cleaver.db"))?;
/// let register = Register::open(store.clone(), store, LocalClock)?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteStore {
    runtime: Arc<Runtime>,
    db: Database,
}

impl SqliteStore {
    /// Opens (and migrates) the database described by `config`.
    pub fn open(config: DbConfig) -> DbResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DbError::Internal(format!("Failed to start runtime: {}", e)))?;

        let db = runtime.block_on(Database::new(config))?;
        debug!("SQLite store ready");

        Ok(SqliteStore {
            runtime: Arc::new(runtime),
            db,
        })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl CatalogPersistence for SqliteStore {
    fn load(&self) -> Result<Catalog, PersistenceError> {
        self.block_on(self.db.products().load_catalog())
            .map_err(|e| PersistenceError::load("catalog", e))
    }

    fn save(&self, catalog: &Catalog) -> Result<(), PersistenceError> {
        self.block_on(self.db.products().replace_all(catalog))
            .map_err(|e| PersistenceError::save("catalog", e))
    }
}

impl HistoryPersistence for SqliteStore {
    fn load(&self) -> Result<Vec<LineItem>, PersistenceError> {
        self.block_on(self.db.sales().list_all())
            .map_err(|e| PersistenceError::load("history", e))
    }

    fn save(&self, history: &[LineItem]) -> Result<(), PersistenceError> {
        self.block_on(self.db.sales().replace_all(history))
            .map_err(|e| PersistenceError::save("history", e))
    }

    /// Inserts only the new sale; earlier lines are already stored.
    fn append(&self, _history: &[LineItem], sale: &[LineItem]) -> Result<(), PersistenceError> {
        let sale_id = self
            .block_on(self.db.sales().insert_sale(sale))
            .map_err(|e| PersistenceError::save("history", e))?;
        debug!(sale_id = %sale_id, lines = sale.len(), "Stored finalized sale");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
