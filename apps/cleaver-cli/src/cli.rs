//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use cleaver_core::validation::parse_report_date;
use cleaver_core::Money;

// =============================================================================
// Entry + global options
// =============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "cleaver",
    version,
    about = "Butcher-counter register",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (default: cleaver.toml in the data directory, if present).
    #[arg(long, global = true, value_name = "FILE", env = "CLEAVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Machine-readable JSON output for one-shot commands.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive register reading commands from stdin.
    Session,

    /// Catalog maintenance.
    #[command(subcommand)]
    Product(ProductCmd),

    /// Per-product totals for one day.
    Report(ReportArgs),

    /// Finalized sale lines.
    History(HistoryArgs),
}

#[derive(Subcommand, Debug)]
pub enum ProductCmd {
    /// List the catalog with prices.
    #[command(alias = "ls")]
    List,

    /// Add a product.
    Add {
        /// Four-digit code, e.g. 0018.
        code: String,
        name: String,
        /// Price per kilogram, e.g. 39.90.
        #[arg(value_parser = parse_price)]
        price: Money,
    },

    /// Change the price per kilogram of a product.
    Price {
        code: String,
        #[arg(value_parser = parse_price)]
        price: Money,
    },

    /// Delete one or more products. Unknown codes are ignored.
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Day to report (YYYY-MM-DD). Default: today.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Also write the report as CSV. A directory gets the default file name.
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only lines sold on this day (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Write the lines as CSV instead of a table.
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,
}

fn parse_price(input: &str) -> Result<Money, String> {
    Money::parse(input).map_err(|e| e.to_string())
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    parse_report_date(input).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_product_add() {
        let cli = Cli::parse_from(["cleaver", "product", "add", "0018", "Picanha", "69.90"]);
        match cli.command {
            Commands::Product(ProductCmd::Add { code, name, price }) => {
                assert_eq!(code, "0018");
                assert_eq!(name, "Picanha");
                assert_eq!(price, Money::from_cents(6990));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_report_with_date_and_global_flags() {
        let cli = Cli::parse_from([
            "cleaver", "report", "--date", "2026-10-17", "--json", "--config", "c.toml",
        ]);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.date, NaiveDate::from_ymd_opt(2026, 10, 17));
                assert!(args.csv.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_price_and_date() {
        assert!(Cli::try_parse_from(["cleaver", "product", "price", "0001", "abc"]).is_err());
        assert!(Cli::try_parse_from(["cleaver", "report", "--date", "17/10/2026"]).is_err());
        assert!(Cli::try_parse_from(["cleaver", "product", "delete"]).is_err());
    }
}
