//! A full counter day driven through the command protocol.

use chrono::NaiveDate;
use cleaver_core::{
    Catalog, Command, ErrorCategory, FixedClock, InMemoryStore, Money, Outcome, Register, Weight,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn scan(raw: &str, weight: Weight) -> Command {
    Command::Scan {
        raw: raw.to_string(),
        manual_weight: weight,
    }
}

#[test]
fn lombinho_sale_reaches_the_daily_report() {
    let mut catalog = Catalog::new();
    catalog
        .add("0001", "Lombinho", Money::parse("39.90").unwrap())
        .unwrap();
    let store = InMemoryStore::with_catalog(catalog);
    let mut register = Register::open(store.clone(), store.clone(), FixedClock(today())).unwrap();

    let outcome = register
        .execute(scan("0001", Weight::parse_kg("1.2").unwrap()))
        .unwrap();
    let item = match outcome {
        Outcome::ItemAdded { item, .. } => item,
        other => panic!("expected an added item, got {:?}", other),
    };
    assert_eq!(item.weight(), Weight::from_grams(1200));
    assert_eq!(item.subtotal(), Money::parse("47.88").unwrap());

    register.execute(Command::FinalizeSale).unwrap();
    assert_eq!(register.history().len(), 1);
    assert_eq!(register.history().entries()[0].date(), today());
    assert_eq!(store.saved_history().len(), 1);

    let rows = register.daily_report(today()).rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_name, "Lombinho");
    assert_eq!(rows[0].total_weight, Weight::from_grams(1200));
}

#[test]
fn reopened_register_sees_persisted_state() {
    let store = InMemoryStore::new();
    {
        let mut register =
            Register::open(store.clone(), store.clone(), FixedClock(today())).unwrap();
        register
            .execute(Command::AddProduct {
                code: "0010".to_string(),
                name: "Baço".to_string(),
                price: Money::from_cents(1600),
            })
            .unwrap();
        register
            .execute(scan("2000100123405", Weight::zero()))
            .unwrap();
        register.execute(Command::FinalizeSale).unwrap();
    }

    let register = Register::open(store.clone(), store, FixedClock(today())).unwrap();
    assert!(register.catalog().contains("0010"));

    let report = register.daily_report(today());
    assert_eq!(report.total_weight, Weight::from_grams(1234));
    assert_eq!(report.total_revenue, Money::from_cents(1974));
}

#[test]
fn every_rejection_is_categorized() {
    let mut catalog = Catalog::new();
    catalog.add("0001", "Lombinho", Money::from_cents(3990)).unwrap();
    let store = InMemoryStore::with_catalog(catalog);
    let mut register = Register::open(store.clone(), store.clone(), FixedClock(today())).unwrap();

    let cases = [
        (scan("12345", Weight::from_grams(100)), ErrorCategory::Format),
        (scan("2000X00123405", Weight::zero()), ErrorCategory::Format),
        (scan("0001", Weight::zero()), ErrorCategory::Format),
        (scan("2000990123405", Weight::zero()), ErrorCategory::Lookup),
        (
            Command::UpdatePrice {
                code: "0099".to_string(),
                price: Money::from_cents(100),
            },
            ErrorCategory::Lookup,
        ),
        (
            Command::AddProduct {
                code: "0001".to_string(),
                name: "Lombinho".to_string(),
                price: Money::from_cents(100),
            },
            ErrorCategory::Validation,
        ),
        (Command::RemoveItem { index: 0 }, ErrorCategory::Validation),
        (Command::FinalizeSale, ErrorCategory::Validation),
    ];

    for (command, expected) in cases {
        let err = register.execute(command.clone()).unwrap_err();
        assert_eq!(err.category(), expected, "{:?} gave {}", command, err);
    }

    register.execute(scan("0001", Weight::from_grams(500))).unwrap();
    store.set_fail_saves(true);
    let err = register.execute(Command::FinalizeSale).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Persistence);
    assert_eq!(register.ledger().len(), 1);
}
