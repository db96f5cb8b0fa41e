//! # CSV Export
//!
//! Tabular shapes shared by the history file, receipts and report exports.
//!
//! ## Layouts
//! ```text
//! Line items (history file, receipts, history export)
//!   product,weight_kg,price_per_kg,subtotal,date
//!   Lombinho,1.200,39.90,47.88,2026-10-17
//!
//! Daily report
//!   product,total_weight_kg,total_revenue
//!   Lombinho,2.000,79.80
//! ```
//!
//! Amounts are written as plain decimals so the files open cleanly in a
//! spreadsheet; the currency symbol is left out.

use std::io;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cleaver_core::{DailyReportRow, LineItem, Money, Weight};

use crate::error::{DbError, DbResult};
use crate::files::write_atomic;

// =============================================================================
// Records
// =============================================================================

/// Aliases accept the Portuguese headers of the original counter's
/// `historico_vendas.csv` (`Produto,Peso (kg),Preço/kg,Subtotal,Data`).
#[derive(Debug, Serialize, Deserialize)]
struct LineItemRecord {
    #[serde(alias = "Produto")]
    product: String,
    #[serde(alias = "Peso (kg)")]
    weight_kg: String,
    #[serde(alias = "Preço/kg")]
    price_per_kg: String,
    #[serde(alias = "Subtotal")]
    subtotal: String,
    #[serde(alias = "Data")]
    date: String,
}

impl From<&LineItem> for LineItemRecord {
    fn from(item: &LineItem) -> Self {
        LineItemRecord {
            product: item.product_name().to_string(),
            weight_kg: item.weight().to_string(),
            price_per_kg: item.price_per_kg().to_string(),
            subtotal: item.subtotal().to_string(),
            date: item.date().format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportRecord<'a> {
    product: &'a str,
    total_weight_kg: String,
    total_revenue: String,
}

// =============================================================================
// Writers
// =============================================================================

/// Writes line items with a header row.
pub fn write_line_items<W: io::Write>(writer: W, items: &[LineItem]) -> DbResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if items.is_empty() {
        csv_writer.write_record(["product", "weight_kg", "price_per_kg", "subtotal", "date"])?;
    }
    for item in items {
        csv_writer.serialize(LineItemRecord::from(item))?;
    }

    csv_writer.flush().map_err(|e| DbError::Csv(e.into()))?;
    Ok(())
}

/// Writes report rows with a header row.
pub fn write_report<W: io::Write>(writer: W, rows: &[DailyReportRow]) -> DbResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if rows.is_empty() {
        csv_writer.write_record(["product", "total_weight_kg", "total_revenue"])?;
    }
    for row in rows {
        csv_writer.serialize(ReportRecord {
            product: &row.product_name,
            total_weight_kg: row.total_weight.to_string(),
            total_revenue: row.total_revenue.to_string(),
        })?;
    }

    csv_writer.flush().map_err(|e| DbError::Csv(e.into()))?;
    Ok(())
}

/// Writes line items to `path`, replacing it atomically.
pub fn export_line_items(path: &Path, items: &[LineItem]) -> DbResult<()> {
    write_atomic(path, |out| write_line_items(out, items))?;
    debug!(path = %path.display(), lines = items.len(), "Exported line items");
    Ok(())
}

/// Writes a daily report to `path`, replacing it atomically.
pub fn export_report(path: &Path, rows: &[DailyReportRow]) -> DbResult<()> {
    write_atomic(path, |out| write_report(out, rows))?;
    debug!(path = %path.display(), rows = rows.len(), "Exported daily report");
    Ok(())
}

/// `sale_2026-10-17_14-03-22.csv`
pub fn receipt_file_name(finalized_at: NaiveDateTime) -> String {
    format!("sale_{}.csv", finalized_at.format("%Y-%m-%d_%H-%M-%S"))
}

/// `daily_report_2026-10-17.csv`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("daily_report_{}.csv", date.format("%Y-%m-%d"))
}

// =============================================================================
// Reader
// =============================================================================

/// Reads line items written by [`write_line_items`], or a history file
/// with the Portuguese headers of the original counter.
///
/// ## Accepted dates
/// - `2026-10-17`
/// - `2026-10-17 14:03:22`
/// - RFC 3339 (`2026-10-17T14:03:22-03:00`)
///
/// Only the calendar date is kept. Any unreadable row fails the whole read:
/// `source` names the file in the error.
pub fn read_line_items<R: io::Read>(reader: R, source: &str) -> DbResult<Vec<LineItem>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut items = Vec::new();

    for (index, record) in csv_reader.deserialize::<LineItemRecord>().enumerate() {
        // Header is line 1.
        let location = format!("{} line {}", source, index + 2);
        let record = record?;

        let weight = Weight::parse_kg(&record.weight_kg)
            .map_err(|e| DbError::corrupt(&location, e.to_string()))?;
        let price = Money::parse(&record.price_per_kg)
            .map_err(|e| DbError::corrupt(&location, e.to_string()))?;
        let date = parse_date_lenient(&record.date).ok_or_else(|| {
            DbError::corrupt(&location, format!("unrecognized date '{}'", record.date))
        })?;

        let item = LineItem::new(record.product, weight, price, date);

        // Older files hold float-rounded subtotals; the recomputed one wins.
        if let Ok(stored) = Money::parse(&record.subtotal) {
            if stored != item.subtotal() {
                warn!(
                    location = %location,
                    stored = %stored,
                    recomputed = %item.subtotal(),
                    "Stored subtotal differs, using recomputed value"
                );
            }
        }

        items.push(item);
    }

    Ok(items)
}

fn parse_date_lenient(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cleaver_core::report;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn items() -> Vec<LineItem> {
        vec![
            LineItem::new("Lombinho", Weight::from_grams(1200), Money::from_cents(3990), day()),
            LineItem::new("Carne de Cabeça", Weight::from_grams(750), Money::from_cents(1400), day()),
        ]
    }

    #[test]
    fn test_line_items_layout() {
        let mut out = Vec::new();
        write_line_items(&mut out, &items()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "product,weight_kg,price_per_kg,subtotal,date");
        assert_eq!(lines[1], "Lombinho,1.200,39.90,47.88,2026-10-17");
        assert_eq!(lines[2], "Carne de Cabeça,0.750,14.00,10.50,2026-10-17");
    }

    #[test]
    fn test_empty_exports_still_have_headers() {
        let mut out = Vec::new();
        write_line_items(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "product,weight_kg,price_per_kg,subtotal,date\n"
        );

        let mut out = Vec::new();
        write_report(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "product,total_weight_kg,total_revenue\n"
        );
    }

    #[test]
    fn test_report_layout() {
        let rows = report::generate(&items(), day());
        let mut out = Vec::new();
        write_report(&mut out, &rows).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "product,total_weight_kg,total_revenue\n\
             Carne de Cabeça,0.750,10.50\n\
             Lombinho,1.200,47.88\n"
        );
    }

    #[test]
    fn test_read_back_what_was_written() {
        let mut out = Vec::new();
        write_line_items(&mut out, &items()).unwrap();

        let read = read_line_items(out.as_slice(), "history.csv").unwrap();
        assert_eq!(read, items());
    }

    #[test]
    fn test_read_accepts_legacy_dates_and_float_subtotals() {
        let csv = "product,weight_kg,price_per_kg,subtotal,date\n\
                   Lombinho,1.2,39.9,47.879999999,2026-10-17 09:15:00\n\
                   Fato,0.5,28.0,14.0,2026-10-16T23:30:00-03:00\n";

        let read = read_line_items(csv.as_bytes(), "history.csv").unwrap();

        assert_eq!(read[0].subtotal(), Money::from_cents(4788));
        assert_eq!(read[0].date(), day());
        assert_eq!(read[1].date(), NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    }

    #[test]
    fn test_read_accepts_portuguese_headers() {
        let csv = "Produto,Peso (kg),Preço/kg,Subtotal,Data\n\
                   Lombinho,1.2,39.9,47.879999999999995,2026-10-17\n\
                   Fato,0.5,28.0,14.0,2026-10-17\n";

        let read = read_line_items(csv.as_bytes(), "historico_vendas.csv").unwrap();

        assert_eq!(read.len(), 2);
        assert_eq!(read[0].product_name(), "Lombinho");
        assert_eq!(read[0].weight(), Weight::from_grams(1200));
        assert_eq!(read[0].subtotal(), Money::from_cents(4788));
        assert_eq!(read[1].price_per_kg(), Money::from_cents(2800));
    }

    #[test]
    fn test_read_rejects_corrupt_rows() {
        let csv = "product,weight_kg,price_per_kg,subtotal,date\n\
                   Lombinho,1.2,39.90,47.88,2026-10-17\n\
                   Fato,heavy,28.00,14.00,2026-10-17\n";

        let err = read_line_items(csv.as_bytes(), "history.csv").unwrap_err();
        assert!(
            matches!(err, DbError::CorruptRecord { ref location, .. } if location == "history.csv line 3")
        );

        let csv = "product,weight_kg,price_per_kg,subtotal,date\n\
                   Fato,0.5,28.00,14.00,yesterday\n";
        assert!(read_line_items(csv.as_bytes(), "history.csv").is_err());
    }

    #[test]
    fn test_file_names() {
        let at = day().and_hms_opt(14, 3, 22).unwrap();
        assert_eq!(receipt_file_name(at), "sale_2026-10-17_14-03-22.csv");
        assert_eq!(report_file_name(day()), "daily_report_2026-10-17.csv");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("history.csv");

        export_line_items(&path, &items()).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        assert_eq!(read_line_items(file, "history.csv").unwrap(), items());
    }
}
