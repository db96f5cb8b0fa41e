//! # Cleaver CLI Library
//!
//! Command-line front end for the Cleaver register. The binary in `main.rs`
//! only parses arguments and maps errors to exit codes; everything else
//! lives here so it can be tested without a terminal.
//!
//! ## Module Organization
//! ```text
//! cleaver_cli/
//! ├── lib.rs          ◄─── You are here (tracing setup & run)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── Layered AppConfig (defaults → file → env)
//! ├── state.rs        ◄─── Backend selection, Register construction
//! ├── render.rs       ◄─── Plain-text tables for the operator
//! ├── error.rs        ◄─── CliError + exit codes
//! └── commands/
//!     ├── mod.rs      ◄─── Dispatch
//!     ├── session.rs  ◄─── Interactive scan/finalize loop
//!     ├── product.rs  ◄─── Catalog maintenance
//!     ├── report.rs   ◄─── Daily report
//!     └── history.rs  ◄─── Finalized lines
//! ```
//!
//! ## Startup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()       logs to stderr, RUST_LOG overrides             │
//! │  2. AppConfig::load()    defaults → cleaver.toml → CLEAVER_* env        │
//! │  3. open_register()      files or sqlite, seeded on first run           │
//! │  4. dispatch()           one subcommand against the open register       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod state;

use std::io::Write;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::CliError;

/// Sets up the global subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages from every crate
/// - `RUST_LOG=cleaver_db=trace` - Trace the storage layer only
/// - Default: INFO, DEBUG for cleaver crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cleaver=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration, opens the register and runs one subcommand.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())
        .map_err(CliError::from)
        .context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    info!(store = %config.store_name, backend = ?config.storage.backend, "Starting Cleaver");
    let mut register = state::open_register(&config).context("Failed to open register")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::dispatch(&mut register, &config, cli.command, cli.json, &mut out)?;
    out.flush().map_err(CliError::from)?;
    Ok(())
}
