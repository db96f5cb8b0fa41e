//! # History Command
//!
//! `cleaver history [--date YYYY-MM-DD] [--csv FILE]`

use std::io::Write;

use tracing::info;

use cleaver_core::{CatalogPersistence, Clock, HistoryPersistence, LineItem, Register};
use cleaver_db::export::export_line_items;

use crate::cli::HistoryArgs;
use crate::commands::{csv_target, write_json};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::render;

pub fn handle<C, H, K>(
    register: &mut Register<C, H, K>,
    config: &AppConfig,
    args: HistoryArgs,
    json: bool,
    out: &mut dyn Write,
) -> CliResult<()>
where
    C: CatalogPersistence,
    H: HistoryPersistence,
    K: Clock,
{
    let items: Vec<LineItem> = match args.date {
        Some(date) => register.history().query_by_date(date).cloned().collect(),
        None => register.history().entries().to_vec(),
    };

    if let Some(path) = args.csv {
        let default_name = match args.date {
            Some(date) => format!("history_{}.csv", date.format("%Y-%m-%d")),
            None => "history.csv".to_string(),
        };
        let path = csv_target(&path, &default_name);
        export_line_items(&path, &items)?;
        info!(path = %path.display(), lines = items.len(), "History exported");
        writeln!(out, "{} lines written to {}", items.len(), path.display())?;
        return Ok(());
    }

    if json {
        write_json(out, &items)
    } else {
        writeln!(out, "{}", render::history(config, &items))?;
        Ok(())
    }
}
