//! Text rendering for the terminal.
//!
//! Weights are shown in kilograms with three decimals, amounts with the
//! configured currency symbol.

use std::fmt::Write as _;

use cleaver_core::{Catalog, DailyReport, LineItem, Outcome, SaleLedger};

use crate::config::AppConfig;

/// `#0  Lombinho              1.200 kg × R$ 39.90 = R$ 47.88`
pub fn line_item(config: &AppConfig, index: usize, item: &LineItem) -> String {
    format!(
        "#{:<3} {:<22} {:>8} kg × {:>10} = {:>10}",
        index,
        item.product_name(),
        item.weight().to_string(),
        config.format_currency(item.price_per_kg()),
        config.format_currency(item.subtotal()),
    )
}

/// The in-progress sale with its total.
pub fn ledger(config: &AppConfig, ledger: &SaleLedger) -> String {
    if ledger.is_empty() {
        return "Sale is empty.".to_string();
    }

    let mut out = String::new();
    for (index, item) in ledger.items().iter().enumerate() {
        let _ = writeln!(out, "{}", line_item(config, index, item));
    }
    let _ = write!(
        out,
        "{} items, {} kg, total {}",
        ledger.len(),
        ledger.total_weight(),
        config.format_currency(ledger.total())
    );
    out
}

/// Catalog table ordered by code.
pub fn catalog(config: &AppConfig, catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "Catalog is empty.".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:<24} {:>12}", "Code", "Product", "Price/kg");
    for product in catalog.products() {
        let _ = writeln!(
            out,
            "{:<6} {:<24} {:>12}",
            product.code.as_str(),
            product.name,
            config.format_currency(product.price_per_kg)
        );
    }
    let _ = write!(out, "{} products", catalog.len());
    out
}

/// Daily report table, alphabetical by product.
pub fn report(config: &AppConfig, report: &DailyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Daily report {}", report.date.format("%Y-%m-%d"));

    if report.is_empty() {
        let _ = write!(out, "No sales.");
        return out;
    }

    let _ = writeln!(out, "{:<24} {:>10} {:>12}", "Product", "kg", "Revenue");
    for row in &report.rows {
        let _ = writeln!(
            out,
            "{:<24} {:>10} {:>12}",
            row.product_name,
            row.total_weight.to_string(),
            config.format_currency(row.total_revenue)
        );
    }
    let _ = write!(
        out,
        "{:<24} {:>10} {:>12}",
        "TOTAL",
        report.total_weight.to_string(),
        config.format_currency(report.total_revenue)
    );
    out
}

/// Finalized lines, oldest first.
pub fn history(config: &AppConfig, items: &[LineItem]) -> String {
    if items.is_empty() {
        return "No sales recorded.".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{}  {:<22} {:>8} kg  {:>10}",
            item.date().format("%Y-%m-%d"),
            item.product_name(),
            item.weight().to_string(),
            config.format_currency(item.subtotal())
        );
    }
    let _ = write!(out, "{} lines", items.len());
    out
}

/// What the operator sees after a successful command.
pub fn outcome(config: &AppConfig, outcome: &Outcome) -> String {
    match outcome {
        Outcome::ItemAdded { index, item, total } => format!(
            "+ {}\n  Total: {}",
            line_item(config, *index, item),
            config.format_currency(*total)
        ),
        Outcome::ItemRemoved { index, item, total } => format!(
            "- {}\n  Total: {}",
            line_item(config, *index, item),
            config.format_currency(*total)
        ),
        Outcome::SaleFinalized { items, total } => {
            let mut out = String::from("Sale finalized:\n");
            for (index, item) in items.iter().enumerate() {
                let _ = writeln!(out, "  {}", line_item(config, index, item));
            }
            let _ = write!(out, "  TOTAL {}", config.format_currency(*total));
            out
        }
        Outcome::ProductAdded(product) => format!(
            "Added {} {} at {}/kg",
            product.code,
            product.name,
            config.format_currency(product.price_per_kg)
        ),
        Outcome::PriceUpdated {
            code,
            previous,
            current,
        } => format!(
            "Price of {} changed from {} to {}",
            code,
            config.format_currency(*previous),
            config.format_currency(*current)
        ),
        Outcome::ProductsDeleted { removed } if removed.is_empty() => {
            "No matching products; nothing deleted.".to_string()
        }
        Outcome::ProductsDeleted { removed } => {
            let codes: Vec<&str> = removed.iter().map(|code| code.as_str()).collect();
            format!("Deleted {}", codes.join(", "))
        }
        Outcome::Report(daily) => report(config, daily),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cleaver_core::{Money, Weight};

    fn item() -> LineItem {
        LineItem::new(
            "Lombinho",
            Weight::from_grams(1200),
            Money::from_cents(3990),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        )
    }

    #[test]
    fn test_line_item_shows_weight_price_and_subtotal() {
        let text = line_item(&AppConfig::default(), 0, &item());
        assert!(text.starts_with("#0"));
        assert!(text.contains("Lombinho"));
        assert!(text.contains("1.200 kg"));
        assert!(text.contains("R$ 39.90"));
        assert!(text.ends_with("R$ 47.88"));
    }

    #[test]
    fn test_report_lists_rows_and_total() {
        let items = vec![item()];
        let daily = DailyReport::build(&items, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());

        let text = report(&AppConfig::default(), &daily);
        assert!(text.starts_with("Daily report 2026-10-17"));
        assert!(text.contains("Lombinho"));
        assert!(text.lines().last().unwrap().starts_with("TOTAL"));

        let empty = DailyReport::build(&items, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert!(report(&AppConfig::default(), &empty).ends_with("No sales."));
    }

    #[test]
    fn test_empty_delete_says_so() {
        let text = outcome(
            &AppConfig::default(),
            &Outcome::ProductsDeleted { removed: vec![] },
        );
        assert!(text.contains("nothing deleted"));
    }
}
