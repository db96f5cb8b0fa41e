//! # Interactive Session
//!
//! Reads operator lines, turns them into register commands and prints the
//! outcome. A rejected line never ends the session.
//!
//! ## Session Lines
//! ```text
//! scan <raw> [weight]          scan 0001 1.2   |   scan 2000100123405
//! remove <index>               remove 0
//! show | total                 current sale
//! finalize                     close the sale, write receipt if configured
//! add <code> <price> <name…>   add 0018 69.90 Picanha Maturada
//! price <code> <price>         price 0001 41.90
//! delete <code>…               delete 0003 0004
//! report [YYYY-MM-DD]          daily report (default: today)
//! products                     catalog
//! help | quit
//! ```

use std::io::{BufRead, Write};

use chrono::Local;
use tracing::{debug, info, warn};

use cleaver_core::validation::parse_report_date;
use cleaver_core::{
    CatalogPersistence, Clock, Command, HistoryPersistence, LineItem, Money, Outcome, Register,
    Weight,
};
use cleaver_db::export::{export_line_items, receipt_file_name};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::render;

const HELP: &str = "\
Commands:
  scan <raw> [weight]          add an item (weight in kg for 4-digit codes)
  remove <index>               remove an item from the sale
  show | total                 show the current sale
  finalize                     finalize the sale
  add <code> <price> <name>    add a product
  price <code> <price>         change a price per kg
  delete <code>...             delete products
  report [YYYY-MM-DD]          daily report
  products                     list the catalog
  help                         this text
  quit                         leave (an open sale is discarded)";

/// One parsed operator line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLine {
    Command(Command),
    Show,
    Products,
    Help,
    Quit,
    Empty,
}

/// Parses one operator line.
pub fn parse_line(line: &str) -> CliResult<SessionLine> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(SessionLine::Empty);
    };
    let args: Vec<&str> = words.collect();

    let line = match verb.to_ascii_lowercase().as_str() {
        "scan" | "s" => {
            let raw = arg(&args, 0, "scan <raw> [weight]")?;
            let manual_weight = match args.get(1) {
                Some(weight) => Weight::parse_kg(weight)?,
                None => Weight::zero(),
            };
            SessionLine::Command(Command::Scan {
                raw: raw.to_string(),
                manual_weight,
            })
        }
        "remove" | "rm" => {
            let index = arg(&args, 0, "remove <index>")?;
            let index = index
                .parse()
                .map_err(|_| CliError::invalid_input(format!("'{}' is not an item index", index)))?;
            SessionLine::Command(Command::RemoveItem { index })
        }
        "finalize" | "f" => SessionLine::Command(Command::FinalizeSale),
        "add" => {
            let usage = "add <code> <price> <name>";
            let code = arg(&args, 0, usage)?;
            let price = Money::parse(arg(&args, 1, usage)?)?;
            if args.len() < 3 {
                return Err(CliError::invalid_input(format!("usage: {}", usage)));
            }
            SessionLine::Command(Command::AddProduct {
                code: code.to_string(),
                name: args[2..].join(" "),
                price,
            })
        }
        "price" => {
            let usage = "price <code> <price>";
            let code = arg(&args, 0, usage)?;
            let price = Money::parse(arg(&args, 1, usage)?)?;
            SessionLine::Command(Command::UpdatePrice {
                code: code.to_string(),
                price,
            })
        }
        "delete" | "del" => {
            if args.is_empty() {
                return Err(CliError::invalid_input("usage: delete <code>..."));
            }
            SessionLine::Command(Command::DeleteProducts {
                codes: args.iter().map(|code| code.to_string()).collect(),
            })
        }
        "report" => {
            let date = args.first().map(|d| parse_report_date(d)).transpose()?;
            SessionLine::Command(Command::DailyReport { date })
        }
        "show" | "total" => SessionLine::Show,
        "products" | "catalog" => SessionLine::Products,
        "help" | "?" => SessionLine::Help,
        "quit" | "exit" | "q" => SessionLine::Quit,
        other => {
            return Err(CliError::invalid_input(format!(
                "Unknown command '{}'. Type 'help' for the list.",
                other
            )))
        }
    };

    Ok(line)
}

fn arg<'a>(args: &[&'a str], index: usize, usage: &str) -> CliResult<&'a str> {
    args.get(index)
        .copied()
        .ok_or_else(|| CliError::invalid_input(format!("usage: {}", usage)))
}

// =============================================================================
// Session Loop
// =============================================================================

/// Runs an interactive session until `quit` or end of input.
pub struct Session<'a, C, H, K> {
    register: &'a mut Register<C, H, K>,
    config: &'a AppConfig,
    /// Last accepted scan, for repeated-scan suppression.
    last_scan: Option<(String, Weight)>,
}

impl<'a, C, H, K> Session<'a, C, H, K>
where
    C: CatalogPersistence,
    H: HistoryPersistence,
    K: Clock,
{
    pub fn new(register: &'a mut Register<C, H, K>, config: &'a AppConfig) -> Self {
        Session {
            register,
            config,
            last_scan: None,
        }
    }

    /// Processes lines from `input` and writes responses to `out`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> std::io::Result<()> {
        writeln!(out, "{} register. Type 'help' for commands.", self.config.store_name)?;

        for line in input.lines() {
            let line = line?;
            match parse_line(&line) {
                Ok(SessionLine::Quit) => break,
                Ok(parsed) => {
                    let response = self.handle(parsed);
                    if !response.is_empty() {
                        writeln!(out, "{}", response)?;
                    }
                }
                Err(e) => writeln!(out, "error: {}", e)?,
            }
        }

        if !self.register.ledger().is_empty() {
            warn!(
                items = self.register.ledger().len(),
                "Session ended with an open sale; it was not recorded"
            );
            writeln!(out, "Open sale discarded.")?;
        }
        Ok(())
    }

    fn handle(&mut self, line: SessionLine) -> String {
        match line {
            SessionLine::Command(command) => match self.execute(command) {
                Ok(text) => text,
                Err(e) => format!("error: {}", e),
            },
            SessionLine::Show => render::ledger(self.config, self.register.ledger()),
            SessionLine::Products => render::catalog(self.config, self.register.catalog()),
            SessionLine::Help => HELP.to_string(),
            SessionLine::Quit | SessionLine::Empty => String::new(),
        }
    }

    fn execute(&mut self, command: Command) -> CliResult<String> {
        let scan = match &command {
            Command::Scan { raw, manual_weight } => Some((raw.clone(), *manual_weight)),
            _ => None,
        };

        if let Some((raw, _)) = &scan {
            if self.config.session.suppress_repeated_scans && self.last_scan == scan {
                debug!(raw = %raw, "Suppressed repeated scan");
                return Ok(format!("Ignored repeated scan of {}.", raw));
            }
        }

        let outcome = self.register.execute(command)?;

        match &outcome {
            Outcome::ItemAdded { item, .. } => {
                debug!(product = %item.product_name(), weight = %item.weight(), "Scanned");
                self.last_scan = scan;
            }
            Outcome::SaleFinalized { items, total } => {
                info!(items = items.len(), total = %total, "Sale finalized");
                self.last_scan = None;
                let mut text = render::outcome(self.config, &outcome);
                if let Some(note) = self.write_receipt(items) {
                    text.push('\n');
                    text.push_str(&note);
                }
                return Ok(text);
            }
            _ => {}
        }

        Ok(render::outcome(self.config, &outcome))
    }

    /// Writes the receipt CSV when a receipts directory is configured.
    ///
    /// The sale is already recorded; a failed receipt is reported, not
    /// raised.
    fn write_receipt(&self, items: &[LineItem]) -> Option<String> {
        let dir = self.config.receipts_path()?;
        let path = dir.join(receipt_file_name(Local::now().naive_local()));

        match export_line_items(&path, items) {
            Ok(()) => {
                info!(path = %path.display(), "Receipt written");
                Some(format!("Receipt: {}", path.display()))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Receipt could not be written");
                Some(format!("warning: receipt not written: {}", e))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cleaver_core::{Catalog, FixedClock, InMemoryStore};
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn store() -> InMemoryStore {
        let mut catalog = Catalog::new();
        catalog.add("0001", "Lombinho", Money::from_cents(3990)).unwrap();
        catalog.add("0010", "Baço", Money::from_cents(1600)).unwrap();
        InMemoryStore::with_catalog(catalog)
    }

    fn run(config: &AppConfig, store: &InMemoryStore, input: &str) -> String {
        let mut register = Register::open(store.clone(), store.clone(), FixedClock(today())).unwrap();
        let mut out = Vec::new();
        Session::new(&mut register, config)
            .run(Cursor::new(input), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_lines() {
        assert_eq!(
            parse_line("scan 0001 1.2").unwrap(),
            SessionLine::Command(Command::Scan {
                raw: "0001".into(),
                manual_weight: Weight::from_grams(1200),
            })
        );
        assert_eq!(
            parse_line("  SCAN 2000100123405 ").unwrap(),
            SessionLine::Command(Command::Scan {
                raw: "2000100123405".into(),
                manual_weight: Weight::zero(),
            })
        );
        assert_eq!(
            parse_line("add 0018 69.90 Picanha Maturada").unwrap(),
            SessionLine::Command(Command::AddProduct {
                code: "0018".into(),
                name: "Picanha Maturada".into(),
                price: Money::from_cents(6990),
            })
        );
        assert_eq!(
            parse_line("report 2026-10-17").unwrap(),
            SessionLine::Command(Command::DailyReport { date: Some(today()) })
        );
        assert_eq!(parse_line("").unwrap(), SessionLine::Empty);
        assert_eq!(parse_line("quit").unwrap(), SessionLine::Quit);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(parse_line("scan").is_err());
        assert!(parse_line("scan 0001 heavy").is_err());
        assert!(parse_line("remove first").is_err());
        assert!(parse_line("add 0018 69.90").is_err());
        assert!(parse_line("delete").is_err());
        assert!(parse_line("report yesterday").is_err());
        assert!(parse_line("weigh 0001").is_err());
    }

    #[test]
    fn test_sale_through_session() {
        let store = store();
        let output = run(
            &AppConfig::default(),
            &store,
            "scan 0001 1.2\nscan 2000100123405\nshow\nfinalize\nreport\nquit\n",
        );

        assert!(output.contains("R$ 47.88"));
        assert!(output.contains("Sale finalized"));
        assert!(output.contains("TOTAL R$ 67.62"));
        assert!(output.contains("Daily report 2026-10-17"));
        assert_eq!(store.saved_history().len(), 2);
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let store = store();
        let output = run(
            &AppConfig::default(),
            &store,
            "scan 0099 1\nscan 2000990012340\nscan 0001\nfinalize\nscan 0001 0.5\nfinalize\n",
        );

        assert!(output.contains("error: Unsupported barcode format: '0099'"));
        assert!(output.contains("error: Product not registered: 0099"));
        assert!(output.contains("error: Manual weight must be positive"));
        assert!(output.contains("error: Cannot finalize an empty sale"));
        assert_eq!(store.saved_history().len(), 1);
    }

    #[test]
    fn test_repeated_scan_suppression() {
        let mut config = AppConfig::default();
        config.session.suppress_repeated_scans = true;
        let store = store();

        let output = run(
            &config,
            &store,
            "scan 0001 1.2\nscan 0001 1.2\nscan 0001 0.8\nfinalize\nscan 0001 0.8\nfinalize\n",
        );

        assert!(output.contains("Ignored repeated scan of 0001."));
        // 1.2 + 0.8 in the first sale, 0.8 again after finalize resets the guard.
        assert_eq!(store.saved_history().len(), 3);
    }

    #[test]
    fn test_repeated_scans_allowed_by_default() {
        let store = store();
        run(&AppConfig::default(), &store, "scan 0001 1.2\nscan 0001 1.2\nfinalize\n");
        assert_eq!(store.saved_history().len(), 2);
    }

    #[test]
    fn test_receipt_written_on_finalize() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.receipts_dir = Some(dir.path().join("receipts"));
        let store = store();

        let output = run(&config, &store, "scan 0001 1.2\nfinalize\n");
        assert!(output.contains("Receipt: "));

        let receipts: Vec<_> = std::fs::read_dir(dir.path().join("receipts"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(receipts.len(), 1);
        assert!(receipts[0].starts_with("sale_") && receipts[0].ends_with(".csv"));
    }

    #[test]
    fn test_catalog_edits_through_session() {
        let store = store();
        let output = run(
            &AppConfig::default(),
            &store,
            "add 0018 69.90 Picanha\nprice 0001 41.90\ndelete 0010 0042\nproducts\n",
        );

        assert!(output.contains("Added 0018 Picanha"));
        assert!(output.contains("from R$ 39.90 to R$ 41.90"));
        assert!(output.contains("Deleted 0010"));

        let saved = store.saved_catalog();
        assert_eq!(saved.len(), 2);
        assert!(saved.contains("0018"));
        assert!(!saved.contains("0010"));
    }

    #[test]
    fn test_open_sale_is_discarded_at_end_of_input() {
        let store = store();
        let output = run(&AppConfig::default(), &store, "scan 0001 1.2\n");

        assert!(output.contains("Open sale discarded."));
        assert!(store.saved_history().is_empty());
    }
}
