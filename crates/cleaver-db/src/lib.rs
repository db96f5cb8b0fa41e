//! # cleaver-db: Persistence for Cleaver
//!
//! Implements the catalog and history collaborators of cleaver-core, in
//! two flavours, plus the CSV exports the register hands out.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cleaver Data Flow                                │
//! │                                                                         │
//! │  Register (cleaver-core)                                                │
//! │       │  CatalogPersistence / HistoryPersistence                        │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    cleaver-db (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌────────────────┐   ┌────────────────┐   ┌───────────────┐   │    │
//! │  │   │  files         │   │  store         │   │  export       │   │    │
//! │  │   │                │   │                │   │               │   │    │
//! │  │   │ JsonCatalog    │   │ SqliteStore    │   │ receipts      │   │    │
//! │  │   │ CsvHistory     │   │  └─ Database   │   │ reports       │   │    │
//! │  │   │ write_atomic   │   │     └─ repos   │   │ history       │   │    │
//! │  │   └────────────────┘   └────────────────┘   └───────────────┘   │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  catalog.json + history.csv        or        cleaver.db (SQLite)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`files`] - JSON catalog and CSV history files, atomic writes
//! - [`store`] - Blocking adapter over the SQLite repositories
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Product and sale repositories
//! - [`export`] - CSV layouts for receipts, history and reports
//! - [`seed`] - The default catalog
//! - [`error`] - Persistence error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cleaver_core::Register;
//! use cleaver_db::{CsvHistoryStore, JsonCatalogStore};
//!
//! let register = Register::open(
//!     JsonCatalogStore::new("data/catalog.json"),
//!     CsvHistoryStore::new("data/history.csv"),
//!     clock,
//! )?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod export;
pub mod files;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use files::{CsvHistoryStore, JsonCatalogStore};
pub use pool::{Database, DbConfig};
pub use store::SqliteStore;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
