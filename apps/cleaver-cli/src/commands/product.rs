//! # Product Commands
//!
//! Catalog maintenance from the command line. Every change goes through
//! the register, so it is validated and saved exactly as in a session.

use std::io::Write;

use tracing::info;

use cleaver_core::{CatalogPersistence, Clock, Command, HistoryPersistence, Product, Register};

use crate::cli::ProductCmd;
use crate::commands::write_json;
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::render;

pub fn handle<C, H, K>(
    register: &mut Register<C, H, K>,
    config: &AppConfig,
    cmd: ProductCmd,
    json: bool,
    out: &mut dyn Write,
) -> CliResult<()>
where
    C: CatalogPersistence,
    H: HistoryPersistence,
    K: Clock,
{
    let command = match cmd {
        ProductCmd::List => {
            if json {
                let products: Vec<&Product> = register.catalog().products().collect();
                return write_json(out, &products);
            }
            writeln!(out, "{}", render::catalog(config, register.catalog()))?;
            return Ok(());
        }
        ProductCmd::Add { code, name, price } => Command::AddProduct { code, name, price },
        ProductCmd::Price { code, price } => Command::UpdatePrice { code, price },
        ProductCmd::Delete { codes } => Command::DeleteProducts { codes },
    };

    let outcome = register.execute(command)?;
    info!(?outcome, "Catalog updated");

    if json {
        write_json(out, &outcome)
    } else {
        writeln!(out, "{}", render::outcome(config, &outcome))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::NaiveDate;
    use cleaver_core::{Catalog, FixedClock, InMemoryStore, Money};

    fn register(store: &InMemoryStore) -> Register<InMemoryStore, InMemoryStore, FixedClock> {
        Register::open(
            store.clone(),
            store.clone(),
            FixedClock(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()),
        )
        .unwrap()
    }

    fn store() -> InMemoryStore {
        let mut catalog = Catalog::new();
        catalog.add("0001", "Lombinho", Money::from_cents(3990)).unwrap();
        InMemoryStore::with_catalog(catalog)
    }

    #[test]
    fn test_list_as_json() {
        let store = store();
        let mut out = Vec::new();

        handle(&mut register(&store), &AppConfig::default(), ProductCmd::List, true, &mut out)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["code"], "0001");
        assert_eq!(value[0]["price_per_kg_cents"], 3990);
    }

    #[test]
    fn test_add_as_json_uses_the_list_shape() {
        let store = store();
        let mut out = Vec::new();
        let add = ProductCmd::Add {
            code: "0018".into(),
            name: "Picanha".into(),
            price: Money::from_cents(6990),
        };

        handle(&mut register(&store), &AppConfig::default(), add, true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["kind"], "product_added");
        assert_eq!(value["code"], "0018");
        assert_eq!(value["name"], "Picanha");
        assert_eq!(value["price_per_kg_cents"], 6990);
    }

    #[test]
    fn test_add_and_price_are_saved() {
        let store = store();
        let mut register = register(&store);
        let mut out = Vec::new();
        let config = AppConfig::default();

        let add = ProductCmd::Add {
            code: "0018".into(),
            name: "Picanha".into(),
            price: Money::from_cents(6990),
        };
        handle(&mut register, &config, add, false, &mut out).unwrap();

        let price = ProductCmd::Price {
            code: "0018".into(),
            price: Money::from_cents(7490),
        };
        handle(&mut register, &config, price, false, &mut out).unwrap();

        let saved = store.saved_catalog();
        assert_eq!(saved.lookup("0018").unwrap().price_per_kg, Money::from_cents(7490));
        assert!(String::from_utf8(out).unwrap().contains("R$ 69.90 to R$ 74.90"));
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let store = store();
        let add = ProductCmd::Add {
            code: "0001".into(),
            name: "Outro".into(),
            price: Money::from_cents(100),
        };

        let err = handle(&mut register(&store), &AppConfig::default(), add, false, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Rejected);
    }

    #[test]
    fn test_price_of_unknown_product_is_not_found() {
        let store = store();
        let price = ProductCmd::Price {
            code: "0099".into(),
            price: Money::from_cents(100),
        };

        let err = handle(&mut register(&store), &AppConfig::default(), price, false, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
