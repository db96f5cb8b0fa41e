//! # File Backends
//!
//! Plain-file persistence: the catalog as JSON, the history as CSV.
//!
//! ## Write Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  write_atomic(path, body)                                               │
//! │                                                                         │
//! │  1. create parent directory                                             │
//! │  2. body → NamedTempFile in the same directory                          │
//! │  3. flush + fsync                                                       │
//! │  4. rename over `path`     ← readers see the old file or the new one,   │
//! │                              never a torn write                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod history;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{DbError, DbResult};

pub use catalog::JsonCatalogStore;
pub use history::CsvHistoryStore;

/// Replaces `path` with whatever `body` writes.
///
/// If `body` fails, the temporary file is dropped and `path` is untouched.
pub fn write_atomic<F>(path: &Path, body: F) -> DbResult<()>
where
    F: FnOnce(&mut dyn io::Write) -> DbResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| DbError::io(dir, e))?;

    let temp = NamedTempFile::new_in(dir).map_err(|e| DbError::io(dir, e))?;
    {
        let mut out = BufWriter::new(temp.as_file());
        body(&mut out)?;
        out.flush().map_err(|e| DbError::io(path, e))?;
    }
    temp.as_file().sync_all().map_err(|e| DbError::io(path, e))?;

    temp.persist(path).map_err(|e| DbError::io(path, e.error))?;
    Ok(())
}
