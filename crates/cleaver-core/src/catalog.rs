//! # Catalog
//!
//! The products the counter sells, keyed by four-digit code.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lookup(code)            ──► Option<&Product>                           │
//! │  add(code, name, price)  ──► InvalidCode | DuplicateCode | Validation   │
//! │  update_price(code, p)   ──► NotFound | Validation                      │
//! │  remove(codes)           ──► codes actually removed (absent ignored)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation either fully applies or returns an error with the catalog
//! untouched. Listing order is ascending by code.

use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::money::Money;
use crate::types::{Product, ProductCode};
use crate::validation::{validate_price, validate_product_name};

/// Product catalog.
///
/// Only built through [`Catalog::add`] or from products that already passed
/// the same checks ([`Catalog::from_products`]), so it has no `Deserialize`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: BTreeMap<ProductCode, Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Builds a catalog from already-validated products.
    ///
    /// Later duplicates of a code replace earlier ones.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        Catalog {
            products: products
                .into_iter()
                .map(|product| (product.code.clone(), product))
                .collect(),
        }
    }

    /// Finds a product by its raw code.
    ///
    /// ## Example
    /// ```rust
    /// use cleaver_core::{Catalog, Money};
    ///
    /// let mut catalog = Catalog::new();
    /// catalog.add("0001", "Lombinho", Money::from_cents(3990)).unwrap();
    ///
    /// assert_eq!(catalog.lookup("0001").unwrap().name, "Lombinho");
    /// assert!(catalog.lookup("0002").is_none());
    /// ```
    pub fn lookup(&self, code: &str) -> Option<&Product> {
        // Any string that is not a valid code cannot be a key.
        let code = ProductCode::parse(code).ok()?;
        self.products.get(&code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    /// Registers a new product.
    ///
    /// ## Rules
    /// - `code` must be exactly 4 ASCII digits → else `InvalidCode`
    /// - `code` must not be registered yet → else `DuplicateCode`
    /// - `name` non-empty, `price > 0` → else `Validation`
    pub fn add(&mut self, code: &str, name: &str, price: Money) -> Result<&Product, CatalogError> {
        let code = ProductCode::parse(code).map_err(|_| CatalogError::InvalidCode {
            code: code.to_string(),
        })?;

        if self.products.contains_key(&code) {
            return Err(CatalogError::DuplicateCode {
                code: code.to_string(),
            });
        }

        validate_product_name(name)?;
        validate_price(price)?;

        let product = Product::new(code.clone(), name.trim(), price);
        Ok(self.products.entry(code).or_insert(product))
    }

    /// Changes the price per kilogram of a registered product.
    ///
    /// Code and name are never touched. Returns the previous price.
    pub fn update_price(&mut self, code: &str, new_price: Money) -> Result<Money, CatalogError> {
        validate_price(new_price)?;

        let product = ProductCode::parse(code)
            .ok()
            .and_then(|code| self.products.get_mut(&code))
            .ok_or_else(|| CatalogError::NotFound {
                code: code.to_string(),
            })?;

        let previous = product.price_per_kg;
        product.price_per_kg = new_price;
        Ok(previous)
    }

    /// Removes every listed code that is present.
    ///
    /// Absent or malformed codes are ignored, so repeating a removal is a
    /// no-op. Returns the codes that were actually removed, in input order.
    pub fn remove<S: AsRef<str>>(&mut self, codes: &[S]) -> Vec<ProductCode> {
        codes
            .iter()
            .filter_map(|code| ProductCode::parse(code.as_ref()).ok())
            .filter_map(|code| self.products.remove(&code).map(|product| product.code))
            .collect()
    }

    /// Products in ascending code order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
