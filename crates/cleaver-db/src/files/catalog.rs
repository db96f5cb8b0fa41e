//! # JSON Catalog File
//!
//! ## File Layout
//! ```text
//! {
//!     "0001": { "name": "Lombinho", "price_per_kg": "39.90" },
//!     "0002": { "name": "Fraldinha", "price_per_kg": "42.50" }
//! }
//! ```
//!
//! Prices are decimal strings so the file round-trips exactly. Hand-edited
//! files with plain numbers (`39.9`) are accepted and rewritten as strings
//! on the next save.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cleaver_core::validation::{validate_price, validate_product_name};
use cleaver_core::{Catalog, CatalogPersistence, Money, PersistenceError, Product, ProductCode};

use crate::error::{DbError, DbResult};
use crate::files::write_atomic;
use crate::seed;

/// `nome`/`preco` are the keys of the original counter's `produtos.json`.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogEntry {
    #[serde(alias = "nome")]
    name: String,
    #[serde(alias = "preco")]
    price_per_kg: PriceField,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum PriceField {
    Text(String),
    Number(f64),
}

impl PriceField {
    fn to_money(&self) -> Result<Money, String> {
        let parsed = match self {
            PriceField::Text(text) => Money::parse(text),
            PriceField::Number(value) => Money::parse(&format!("{:.2}", value)),
        };
        parsed.map_err(|e| e.to_string())
    }
}

/// Catalog persisted as a JSON object keyed by product code.
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    path: PathBuf,
    seed_default: bool,
}

impl JsonCatalogStore {
    /// A store at `path` that starts a missing file with the default cuts.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonCatalogStore {
            path: path.into(),
            seed_default: true,
        }
    }

    /// Whether a missing file is seeded with the default catalog (default)
    /// or treated as an empty catalog.
    pub fn seed_default(mut self, seed: bool) -> Self {
        self.seed_default = seed;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the catalog file.
    ///
    /// ## Returns
    /// * `Ok(Some(catalog))` - File read and valid
    /// * `Ok(None)` - File does not exist
    /// * `Err(_)` - File unreadable or not a valid catalog
    pub fn read(&self) -> DbResult<Option<Catalog>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DbError::io(&self.path, e)),
        };

        let entries: BTreeMap<String, CatalogEntry> = serde_json::from_slice(&bytes)?;
        let mut products = Vec::with_capacity(entries.len());

        for (code, entry) in entries {
            let location = format!("{} product '{}'", self.path.display(), code);
            let corrupt = |reason: String| DbError::corrupt(&location, reason);

            let code = ProductCode::parse(&code).map_err(|e| corrupt(e.to_string()))?;
            validate_product_name(&entry.name).map_err(|e| corrupt(e.to_string()))?;
            let price = entry.price_per_kg.to_money().map_err(&corrupt)?;
            validate_price(price).map_err(|e| corrupt(e.to_string()))?;

            products.push(Product::new(code, entry.name, price));
        }

        debug!(path = %self.path.display(), count = products.len(), "Read catalog file");
        Ok(Some(Catalog::from_products(products)))
    }

    /// Writes the whole catalog, replacing the file atomically.
    pub fn write(&self, catalog: &Catalog) -> DbResult<()> {
        let entries: BTreeMap<&str, CatalogEntry> = catalog
            .products()
            .map(|p| {
                (
                    p.code.as_str(),
                    CatalogEntry {
                        name: p.name.clone(),
                        price_per_kg: PriceField::Text(p.price_per_kg.to_string()),
                    },
                )
            })
            .collect();

        write_atomic(&self.path, |out| {
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            out.write_all(b"\n").map_err(|e| DbError::io(&self.path, e))
        })?;

        debug!(path = %self.path.display(), count = catalog.len(), "Wrote catalog file");
        Ok(())
    }

    fn load_or_seed(&self) -> DbResult<Catalog> {
        if let Some(catalog) = self.read()? {
            return Ok(catalog);
        }

        if !self.seed_default {
            return Ok(Catalog::new());
        }

        let catalog = seed::default_catalog();
        self.write(&catalog)?;
        info!(
            path = %self.path.display(),
            count = catalog.len(),
            "Catalog file missing, created default catalog"
        );
        Ok(catalog)
    }
}

impl CatalogPersistence for JsonCatalogStore {
    fn load(&self) -> Result<Catalog, PersistenceError> {
        self.load_or_seed()
            .map_err(|e| PersistenceError::load("catalog", e))
    }

    fn save(&self, catalog: &Catalog) -> Result<(), PersistenceError> {
        self.write(catalog)
            .map_err(|e| PersistenceError::save("catalog", e))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
