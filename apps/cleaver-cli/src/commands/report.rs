//! # Report Command
//!
//! `cleaver report [--date YYYY-MM-DD] [--csv FILE]`

use std::io::Write;

use tracing::info;

use cleaver_core::{CatalogPersistence, Clock, HistoryPersistence, Register};
use cleaver_db::export::{export_report, report_file_name};

use crate::cli::ReportArgs;
use crate::commands::{csv_target, write_json};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::render;

pub fn handle<C, H, K>(
    register: &mut Register<C, H, K>,
    config: &AppConfig,
    args: ReportArgs,
    json: bool,
    out: &mut dyn Write,
) -> CliResult<()>
where
    C: CatalogPersistence,
    H: HistoryPersistence,
    K: Clock,
{
    let date = args.date.unwrap_or_else(|| register.today());
    let report = register.daily_report(date);

    if let Some(path) = args.csv {
        let path = csv_target(&path, &report_file_name(date));
        export_report(&path, &report.rows)?;
        info!(path = %path.display(), rows = report.rows.len(), "Report exported");
        if !json {
            writeln!(out, "Report written to {}", path.display())?;
        }
    }

    if json {
        write_json(out, &report)
    } else {
        writeln!(out, "{}", render::report(config, &report))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cleaver_core::{Catalog, FixedClock, InMemoryStore, Money, Weight};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn register_with_sales() -> Register<InMemoryStore, InMemoryStore, FixedClock> {
        let mut catalog = Catalog::new();
        catalog.add("0001", "Lombinho", Money::from_cents(3990)).unwrap();
        catalog.add("0003", "Fato", Money::from_cents(2800)).unwrap();
        let store = InMemoryStore::with_catalog(catalog);

        let mut register = Register::open(store.clone(), store, FixedClock(today())).unwrap();
        register.scan("0001", Weight::from_grams(1200)).unwrap();
        register.scan("0003", Weight::from_grams(500)).unwrap();
        register.scan("0001", Weight::from_grams(800)).unwrap();
        register.finalize().unwrap();
        register
    }

    #[test]
    fn test_report_defaults_to_today() {
        let mut register = register_with_sales();
        let mut out = Vec::new();
        let args = ReportArgs { date: None, csv: None };

        handle(&mut register, &AppConfig::default(), args, false, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Daily report 2026-10-17"));
        assert!(text.contains("Fato"));
        assert!(text.contains("R$ 79.80"));
    }

    #[test]
    fn test_report_csv_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut register = register_with_sales();
        let args = ReportArgs {
            date: Some(today()),
            csv: Some(dir.path().to_path_buf()),
        };

        handle(&mut register, &AppConfig::default(), args, false, &mut Vec::new()).unwrap();

        let csv = std::fs::read_to_string(dir.path().join("daily_report_2026-10-17.csv")).unwrap();
        assert_eq!(
            csv,
            "product,total_weight_kg,total_revenue\nFato,0.500,14.00\nLombinho,2.000,79.80\n"
        );
    }

    #[test]
    fn test_report_as_json() {
        let mut register = register_with_sales();
        let mut out = Vec::new();
        let args = ReportArgs {
            date: Some(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()),
            csv: None,
        };

        handle(&mut register, &AppConfig::default(), args, true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["date"], "2026-10-18");
        assert_eq!(value["rows"].as_array().unwrap().len(), 0);
        assert_eq!(value["total_weight_grams"], 0);
        assert_eq!(value["total_revenue_cents"], 0);
    }
}
