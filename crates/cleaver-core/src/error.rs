//! # Error Types
//!
//! Domain-specific error types for cleaver-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  RegisterError (what a register operation returns)                      │
//! │  ├── DecodeError       - scan rejected (format / lookup)                │
//! │  ├── CatalogError      - catalog mutation rejected (lookup / validation)│
//! │  ├── LedgerError       - sale ledger operation rejected (validation)    │
//! │  └── PersistenceError  - load/save collaborator failed                  │
//! │                                                                         │
//! │  ValidationError       - field-level input checks, wrapped by the above │
//! │                                                                         │
//! │  Every error answers `category()`: the operator's remedy differs        │
//! │  between re-scan, re-register product, fix input and retry storage.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use thiserror::Error;

use crate::money::Weight;

/// Boxed error from a persistence collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// Error Category
// =============================================================================

/// The four remediation classes of register errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Input is structurally wrong. Re-scan or re-type it.
    Format,
    /// Input is well formed but names something that does not exist.
    Lookup,
    /// Input breaks a rule of the target operation.
    Validation,
    /// A load/save collaborator failed. Retry once storage is fixed.
    Persistence,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Format => "format",
            ErrorCategory::Lookup => "lookup",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Persistence => "persistence",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Decode Error
// =============================================================================

/// Why a scanned string could not become a line item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Neither a 13-digit scale barcode nor a known 4-digit code.
    #[error("Unsupported barcode format: '{raw}'")]
    UnsupportedBarcodeFormat { raw: String },

    /// A scale barcode whose code or weight field is unusable.
    ///
    /// ## When This Occurs
    /// - Non-digit characters in offsets 2..6 or 6..11
    /// - A printed weight of zero grams
    #[error("Malformed weight barcode '{raw}': {reason}")]
    MalformedWeightCode { raw: String, reason: String },

    /// A fixed code was scanned without a positive manual weight.
    #[error("Manual weight must be positive, got {weight} kg")]
    InvalidManualWeight { weight: Weight },

    /// The extracted product code is not in the catalog.
    ///
    /// ## User Workflow
    /// ```text
    /// Scan 2001800123405 ──► code "0018" ──► not in catalog
    ///      │
    ///      ▼
    /// UI shows: "Product not registered: 0018" (register it, then re-scan)
    /// ```
    #[error("Product not registered: {code}")]
    UnknownProduct { code: String },
}

impl DecodeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DecodeError::UnsupportedBarcodeFormat { .. }
            | DecodeError::MalformedWeightCode { .. }
            | DecodeError::InvalidManualWeight { .. } => ErrorCategory::Format,
            DecodeError::UnknownProduct { .. } => ErrorCategory::Lookup,
        }
    }
}

// =============================================================================
// Catalog Error
// =============================================================================

/// Catalog mutation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Price update for a code that is not registered.
    #[error("Product not found: {code}")]
    NotFound { code: String },

    /// New product code is not exactly four ASCII digits.
    #[error("Invalid product code '{code}': must be exactly 4 digits")]
    InvalidCode { code: String },

    /// New product code is already registered.
    #[error("Product code '{code}' is already in use")]
    DuplicateCode { code: String },

    /// Name or price failed field validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::NotFound { .. } => ErrorCategory::Lookup,
            CatalogError::InvalidCode { .. }
            | CatalogError::DuplicateCode { .. }
            | CatalogError::Validation(_) => ErrorCategory::Validation,
        }
    }
}

// =============================================================================
// Ledger Error
// =============================================================================

/// In-progress sale failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("No item at position {index} (sale has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Finalize was requested with nothing scanned.
    #[error("Cannot finalize an empty sale")]
    EmptySale,
}

impl LedgerError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

// =============================================================================
// Persistence Error
// =============================================================================

/// A catalog or history collaborator failed to load or save.
///
/// The operation that triggered the save has already been rolled back
/// when this error reaches the caller.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to load {what}: {source}")]
    Load {
        what: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Failed to save {what}: {source}")]
    Save {
        what: &'static str,
        #[source]
        source: BoxError,
    },
}

impl PersistenceError {
    pub fn load(what: &'static str, source: impl Into<BoxError>) -> Self {
        PersistenceError::Load {
            what,
            source: source.into(),
        }
    }

    pub fn save(what: &'static str, source: impl Into<BoxError>) -> Self {
        PersistenceError::Save {
            what,
            source: source.into(),
        }
    }
}

// =============================================================================
// Register Error
// =============================================================================

/// Any failure of a register operation.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl RegisterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegisterError::Decode(e) => e.category(),
            RegisterError::Catalog(e) => e.category(),
            RegisterError::Ledger(e) => e.category(),
            RegisterError::Persistence(_) => ErrorCategory::Persistence,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric price, bad date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for register operations.
pub type RegisterResult<T> = Result<T, RegisterError>;

// =============================================================================
// Unit Tests
// =============================================================================
