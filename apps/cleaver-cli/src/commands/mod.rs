//! # CLI Commands Module
//!
//! Handlers behind each `cleaver` subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (dispatch, output helpers)
//! ├── session.rs  ◄─── Interactive register (scan, finalize, ...)
//! ├── product.rs  ◄─── Catalog list / add / price / delete
//! ├── report.rs   ◄─── Daily report, CSV export
//! └── history.rs  ◄─── Finalized lines, CSV export
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cleaver product price 0001 41.90                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  clap → ProductCmd::Price { code, price }                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  register.execute(Command::UpdatePrice { .. })                          │
//! │         │                                                               │
//! │         ├── Ok(Outcome)  → text table, or JSON with --json              │
//! │         └── Err(e)       → CliError → exit code                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod history;
pub mod product;
pub mod report;
pub mod session;

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use cleaver_core::{CatalogPersistence, Clock, HistoryPersistence, Register};

use crate::cli::Commands;
use crate::config::AppConfig;
use crate::error::CliResult;

/// Runs one subcommand against an open register.
pub fn dispatch<C, H, K>(
    register: &mut Register<C, H, K>,
    config: &AppConfig,
    command: Commands,
    json: bool,
    out: &mut dyn Write,
) -> CliResult<()>
where
    C: CatalogPersistence,
    H: HistoryPersistence,
    K: Clock,
{
    match command {
        Commands::Session => {
            let stdin = std::io::stdin();
            session::Session::new(register, config).run(stdin.lock(), out)?;
            Ok(())
        }
        Commands::Product(cmd) => product::handle(register, config, cmd, json, out),
        Commands::Report(args) => report::handle(register, config, args, json, out),
        Commands::History(args) => history::handle(register, config, args, json, out),
    }
}

/// Pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// A `--csv` argument naming a directory gets `default_name` inside it.
pub(crate) fn csv_target(path: &Path, default_name: &str) -> PathBuf {
    if path.is_dir() {
        path.join(default_name)
    } else {
        path.to_path_buf()
    }
}
