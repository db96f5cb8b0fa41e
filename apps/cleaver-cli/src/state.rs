//! # Register State
//!
//! Opens the register over the configured storage backend.
//!
//! ```text
//! AppConfig.storage.backend
//!   ├── files  → JsonCatalogStore(catalog.json) + CsvHistoryStore(history.csv)
//!   └── sqlite → SqliteStore(cleaver.db) for both
//!                        │
//!                        ▼
//!        Register<CatalogBackend, HistoryBackend, LocalClock>
//! ```

use chrono::{Local, NaiveDate};
use tracing::info;

use cleaver_core::{CatalogPersistence, Clock, HistoryPersistence, Register};
use cleaver_db::seed::default_catalog;
use cleaver_db::{CsvHistoryStore, DbConfig, JsonCatalogStore, SqliteStore};

use crate::config::{AppConfig, Backend};
use crate::error::CliResult;

pub type CatalogBackend = Box<dyn CatalogPersistence>;
pub type HistoryBackend = Box<dyn HistoryPersistence>;

/// The register as the CLI runs it.
pub type CliRegister = Register<CatalogBackend, HistoryBackend, LocalClock>;

/// Today's date from the machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Builds the catalog and history collaborators for `config`.
pub fn open_backends(config: &AppConfig) -> CliResult<(CatalogBackend, HistoryBackend)> {
    match config.storage.backend {
        Backend::Files => {
            let catalog_path = config.catalog_path();
            let history_path = config.history_path();
            info!(
                catalog = %catalog_path.display(),
                history = %history_path.display(),
                "Using file storage"
            );

            let catalog = JsonCatalogStore::new(catalog_path)
                .seed_default(config.storage.seed_default_catalog);
            let history = CsvHistoryStore::new(history_path);
            Ok((Box::new(catalog), Box::new(history)))
        }
        Backend::Sqlite => {
            let db_path = config.database_path();
            let is_new = !db_path.exists();
            info!(path = %db_path.display(), "Using SQLite storage");

            let store = SqliteStore::open(DbConfig::new(&db_path))?;
            if is_new && config.storage.seed_default_catalog {
                CatalogPersistence::save(&store, &default_catalog())?;
                info!("New database, seeded default catalog");
            }

            Ok((Box::new(store.clone()), Box::new(store)))
        }
    }
}

/// Opens the register: loads catalog and history once.
pub fn open_register(config: &AppConfig) -> CliResult<CliRegister> {
    let (catalog, history) = open_backends(config)?;
    let register = Register::open(catalog, history, LocalClock)?;

    info!(
        products = register.catalog().len(),
        history_lines = register.history().len(),
        "Register opened"
    );
    Ok(register)
}
