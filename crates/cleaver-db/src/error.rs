//! # Persistence Error Types
//!
//! Error types for file and database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / io::Error / csv::Error / serde_json::Error               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context (path, line) and categorization   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PersistenceError (cleaver-core) ← load/save of catalog or history      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError ← exit code + message for the operator                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a product code twice
    /// - Reusing a sale id
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed, including CHECK constraint rejections.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Reading or writing a data file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The catalog file is not valid catalog JSON.
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV file could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A stored record parsed but holds a value the register rejects.
    ///
    /// ## When This Occurs
    /// - A history row with a date in no accepted format
    /// - A product row whose code is not four digits
    #[error("Corrupt record {location}: {reason}")]
    CorruptRecord { location: String, reason: String },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        DbError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn corrupt(location: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::CorruptRecord {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                if let Some(field) = msg.split("UNIQUE constraint failed: ").nth(1) {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for persistence operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cleaver_core::PersistenceError;

    #[test]
    fn test_io_error_names_the_path() {
        let err = DbError::io(
            "/data/catalog.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error on /data/catalog.json: denied");
    }

    #[test]
    fn test_converts_into_persistence_error() {
        let err = PersistenceError::load("history", DbError::corrupt("line 3", "bad date"));
        assert_eq!(
            err.to_string(),
            "Failed to load history: Corrupt record line 3: bad date"
        );
    }
}
