//! # Default Catalog
//!
//! The seventeen cuts a new counter starts with.

use cleaver_core::{Catalog, Money, Product, ProductCode};
use tracing::warn;

/// `(code, name, price per kg in cents)`
pub const DEFAULT_PRODUCTS: &[(&str, &str, i64)] = &[
    ("0001", "Lombinho", 3990),
    ("0002", "Fraldinha", 4250),
    ("0003", "Fato", 2800),
    ("0004", "Coração", 2990),
    ("0005", "Fígado", 2200),
    ("0006", "Rins", 2000),
    ("0007", "Bargada Grossa", 1900),
    ("0008", "Bargada Fina", 1850),
    ("0009", "Bargada Gorda", 1700),
    ("0010", "Baço", 1600),
    ("0011", "Sangria", 1500),
    ("0012", "Costela", 2490),
    ("0013", "Osso do Patinho", 1200),
    ("0014", "Carne de Cabeça", 1400),
    ("0015", "Língua", 3300),
    ("0016", "Pé de Cipó", 1950),
    ("0017", "Carne Moída", 3500),
];

/// Builds the default catalog.
pub fn default_catalog() -> Catalog {
    Catalog::from_products(DEFAULT_PRODUCTS.iter().filter_map(|&(code, name, cents)| {
        match ProductCode::parse(code) {
            Ok(code) => Some(Product::new(code, name, Money::from_cents(cents))),
            Err(e) => {
                warn!(code, error = %e, "Skipping invalid default product");
                None
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_complete() {
        let catalog = default_catalog();

        assert_eq!(catalog.len(), DEFAULT_PRODUCTS.len());
        assert_eq!(catalog.lookup("0001").unwrap().name, "Lombinho");
        assert_eq!(
            catalog.lookup("0017").unwrap().price_per_kg,
            Money::from_cents(3500)
        );
        assert!(catalog.products().all(|p| p.price_per_kg.is_positive()));
    }
}
