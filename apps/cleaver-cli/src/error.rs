//! # CLI Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Cleaver                                │
//! │                                                                         │
//! │  RegisterError ── category() ──┐                                        │
//! │  DbError ──────────────────────┤                                        │
//! │  ValidationError ──────────────┼──► CliError { code, message }          │
//! │  config::ConfigError ──────────┘          │                             │
//! │                                           ├── session: print, go on     │
//! │                                           └── one-shot: exit_code()     │
//! │                                                                         │
//! │  Format      → INVALID_INPUT   exit 2                                   │
//! │  Lookup      → NOT_FOUND       exit 3                                   │
//! │  Validation  → REJECTED        exit 4                                   │
//! │  Persistence → STORAGE_ERROR   exit 5                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! With `--json`, a failure is printed as:
//! ```json
//! { "code": "NOT_FOUND", "message": "Product not registered: 0099" }
//! ```

use std::fmt;

use serde::Serialize;

use cleaver_core::{ErrorCategory, PersistenceError, RegisterError, ValidationError};
use cleaver_db::DbError;

/// Error returned from CLI commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for the operator
    pub message: String,
}

/// Error codes, one per remedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed barcode, weight, price or date. Re-scan or re-type.
    InvalidInput,

    /// Product code not in the catalog.
    NotFound,

    /// Well-formed input that breaks a rule (duplicate code, empty sale).
    Rejected,

    /// Catalog or history could not be loaded or saved.
    StorageError,

    /// Unreadable configuration.
    ConfigError,
}

impl ErrorCode {
    /// Process exit code for one-shot commands.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCode::InvalidInput => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::Rejected => 4,
            ErrorCode::StorageError => 5,
            ErrorCode::ConfigError => 6,
        }
    }
}

impl From<ErrorCategory> for ErrorCode {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::Format => ErrorCode::InvalidInput,
            ErrorCategory::Lookup => ErrorCode::NotFound,
            ErrorCategory::Validation => ErrorCode::Rejected,
            ErrorCategory::Persistence => ErrorCode::StorageError,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::InvalidInput, message)
    }

    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }
}

impl From<RegisterError> for CliError {
    fn from(err: RegisterError) -> Self {
        if let RegisterError::Persistence(ref e) = err {
            tracing::error!(error = %e, "Register persistence failed");
        }
        CliError::new(err.category().into(), err.to_string())
    }
}

impl From<PersistenceError> for CliError {
    fn from(err: PersistenceError) -> Self {
        tracing::error!(error = %err, "Persistence failed");
        CliError::new(ErrorCode::StorageError, err.to_string())
    }
}

impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                CliError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, value } => CliError::new(
                ErrorCode::Rejected,
                format!("{} '{}' already exists", field, value),
            ),
            other => {
                tracing::error!(error = %other, "Storage operation failed");
                CliError::new(ErrorCode::StorageError, other.to_string())
            }
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::invalid_input(err.to_string())
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// Failed to write command output.
impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::StorageError, format!("Output failed: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::new(ErrorCode::StorageError, format!("JSON output failed: {}", err))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
