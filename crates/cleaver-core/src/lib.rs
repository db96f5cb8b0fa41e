//! # cleaver-core: Pure Register Logic for Cleaver
//!
//! Everything the butcher-counter register decides lives here: barcode
//! decoding, weight × price arithmetic, the in-progress sale, the sales
//! history and the daily report. No I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cleaver Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cleaver-cli (operator terminal)              │   │
//! │  │    scan ──► remove ──► finalize ──► report ──► export CSV       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Command / Outcome                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ cleaver-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐       │   │
//! │  │   │ barcode  │  │ catalog  │  │  ledger  │  │ history  │       │   │
//! │  │   │ decode   │  │ products │  │ the sale │  │ + report │       │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘       │   │
//! │  │                      register (session)                         │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CatalogPersistence / HistoryPersistence│
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    cleaver-db (persistence)                     │   │
//! │  │          JSON + CSV files, or SQLite via sqlx                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`barcode`] - Scale barcode and fixed code decoding
//! - [`catalog`] - Products keyed by four-digit code
//! - [`ledger`] - The in-progress sale
//! - [`history`] - Finalized sales, queryable by date
//! - [`report`] - Per-product daily totals
//! - [`register`] - Session state, persistence traits, command protocol
//! - [`money`] - Integer money (cents) and weight (grams)
//! - [`types`] - Product, LineItem, DailyReportRow
//! - [`error`] - Error types and categories
//! - [`validation`] - Field rules
//!
//! ## Example Usage
//!
//! ```rust
//! use cleaver_core::{Money, Weight};
//!
//! // 39.90 per kg, 1.200 kg on the scale
//! let price = Money::parse("39.90").unwrap();
//! let weight = Weight::parse_kg("1.2").unwrap();
//!
//! assert_eq!(price.for_weight(weight).to_string(), "47.88");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod catalog;
pub mod error;
pub mod history;
pub mod ledger;
pub mod money;
pub mod register;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use error::{
    CatalogError, DecodeError, ErrorCategory, LedgerError, PersistenceError, RegisterError,
    RegisterResult, ValidationError,
};
pub use history::HistoryStore;
pub use ledger::SaleLedger;
pub use money::{Money, Weight};
pub use register::{
    CatalogPersistence, Clock, Command, FixedClock, HistoryPersistence, InMemoryStore, Outcome,
    Register, SharedRegister,
};
pub use report::DailyReport;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Width of a product code.
pub const PRODUCT_CODE_LEN: usize = 4;

/// Length of a weight-embedded scale barcode.
pub const WEIGHT_BARCODE_LEN: usize = 13;

/// First digit of a weight-embedded scale barcode.
///
/// The "2" prefix is the range GS1 reserves for in-store variable-measure
/// items.
pub const WEIGHT_BARCODE_PREFIX: char = '2';

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 100;
