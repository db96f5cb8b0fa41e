//! # Register Session
//!
//! Owns the catalog, the in-progress sale and the history, and wires them
//! to their persistence collaborators.
//!
//! ## Session Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Register                                     │
//! │                                                                         │
//! │   Command ──► execute() ──┬── Scan ──────► barcode::decode ──► ledger   │
//! │                           ├── RemoveItem ─────────────────────► ledger  │
//! │                           ├── FinalizeSale ─► history.append_with ──┐   │
//! │                           │                                         ▼   │
//! │                           │                        HistoryPersistence   │
//! │                           ├── AddProduct  ┐                             │
//! │                           ├── UpdatePrice ├─► clone ─► mutate ─► save   │
//! │                           ├── DeleteProducts┘          │         │      │
//! │                           │                            │  CatalogPersistence
//! │                           │                            ▼                │
//! │                           │                  swap in only if saved      │
//! │                           └── DailyReport ─► report::generate           │
//! │                                                                         │
//! │   ◄── Outcome (what changed) ── the caller decides what to redraw       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rollback Rules
//! - A failed catalog save leaves the in-memory catalog as it was
//! - A failed history save leaves both the ledger and the history as they were
//! - The ledger is cleared only after the history is persisted

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::Serialize;

use crate::barcode;
use crate::catalog::Catalog;
use crate::error::{CatalogError, LedgerError, PersistenceError, RegisterResult};
use crate::history::HistoryStore;
use crate::ledger::SaleLedger;
use crate::money::{Money, Weight};
use crate::report::DailyReport;
use crate::types::{LineItem, Product, ProductCode};

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Loads and saves the product catalog.
pub trait CatalogPersistence {
    fn load(&self) -> Result<Catalog, PersistenceError>;

    /// Persists the complete catalog. Called after every mutation.
    fn save(&self, catalog: &Catalog) -> Result<(), PersistenceError>;
}

/// Loads and saves the sales history.
pub trait HistoryPersistence {
    fn load(&self) -> Result<Vec<LineItem>, PersistenceError>;

    /// Persists the complete history.
    fn save(&self, history: &[LineItem]) -> Result<(), PersistenceError>;

    /// Persists a newly finalized `sale`, which is already the tail of
    /// `history`.
    ///
    /// Backends that can append in place override this; the default
    /// rewrites everything.
    fn append(&self, history: &[LineItem], sale: &[LineItem]) -> Result<(), PersistenceError> {
        let _ = sale;
        self.save(history)
    }
}

impl<T: CatalogPersistence + ?Sized> CatalogPersistence for Box<T> {
    fn load(&self) -> Result<Catalog, PersistenceError> {
        (**self).load()
    }

    fn save(&self, catalog: &Catalog) -> Result<(), PersistenceError> {
        (**self).save(catalog)
    }
}

impl<T: HistoryPersistence + ?Sized> HistoryPersistence for Box<T> {
    fn load(&self) -> Result<Vec<LineItem>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, history: &[LineItem]) -> Result<(), PersistenceError> {
        (**self).save(history)
    }

    fn append(&self, history: &[LineItem], sale: &[LineItem]) -> Result<(), PersistenceError> {
        (**self).append(history, sale)
    }
}

/// Source of the date stamped on scanned items.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    catalog: Catalog,
    history: Vec<LineItem>,
    fail_saves: bool,
}

/// Keeps catalog and history in memory only.
///
/// Clones share the same state. Used for practice sessions that must not
/// touch real data, and as a test double (`set_fail_saves`).
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        let store = InMemoryStore::default();
        store.lock().catalog = catalog;
        store
    }

    /// Makes every later save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// The last catalog that was saved.
    pub fn saved_catalog(&self) -> Catalog {
        self.lock().catalog.clone()
    }

    /// The last history that was saved.
    pub fn saved_history(&self) -> Vec<LineItem> {
        self.lock().history.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CatalogPersistence for InMemoryStore {
    fn load(&self) -> Result<Catalog, PersistenceError> {
        Ok(self.lock().catalog.clone())
    }

    fn save(&self, catalog: &Catalog) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        if state.fail_saves {
            return Err(PersistenceError::save("catalog", "store rejected the write"));
        }
        state.catalog = catalog.clone();
        Ok(())
    }
}

impl HistoryPersistence for InMemoryStore {
    fn load(&self) -> Result<Vec<LineItem>, PersistenceError> {
        Ok(self.lock().history.clone())
    }

    fn save(&self, history: &[LineItem]) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        if state.fail_saves {
            return Err(PersistenceError::save("history", "store rejected the write"));
        }
        state.history = history.to_vec();
        Ok(())
    }
}

// =============================================================================
// Commands and Outcomes
// =============================================================================

/// An operator request. Maps 1:1 onto the register operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan { raw: String, manual_weight: Weight },
    RemoveItem { index: usize },
    FinalizeSale,
    AddProduct { code: String, name: String, price: Money },
    UpdatePrice { code: String, price: Money },
    DeleteProducts { codes: Vec<String> },
    /// Report for `date`, or for today when `None`.
    DailyReport { date: Option<NaiveDate> },
}

/// What a successful command changed.
///
/// Money fields serialize as integer cents under `*_cents` names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    ItemAdded {
        index: usize,
        item: LineItem,
        #[serde(rename = "total_cents")]
        total: Money,
    },
    ItemRemoved {
        index: usize,
        item: LineItem,
        #[serde(rename = "total_cents")]
        total: Money,
    },
    SaleFinalized {
        items: Vec<LineItem>,
        #[serde(rename = "total_cents")]
        total: Money,
    },
    ProductAdded(Product),
    PriceUpdated {
        code: ProductCode,
        #[serde(rename = "previous_cents")]
        previous: Money,
        #[serde(rename = "current_cents")]
        current: Money,
    },
    ProductsDeleted {
        removed: Vec<ProductCode>,
    },
    Report(DailyReport),
}

// =============================================================================
// Register
// =============================================================================

/// One register session.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use cleaver_core::register::{FixedClock, InMemoryStore, Register};
/// use cleaver_core::{Money, Weight};
///
/// let store = InMemoryStore::new();
/// let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
/// let mut register = Register::open(store.clone(), store, FixedClock(today)).unwrap();
///
/// register.add_product("0001", "Lombinho", Money::from_cents(3990)).unwrap();
/// register.scan("0001", Weight::from_grams(1200)).unwrap();
/// assert_eq!(register.ledger().total(), Money::from_cents(4788));
///
/// register.finalize().unwrap();
/// assert!(register.ledger().is_empty());
/// assert_eq!(register.history().len(), 1);
/// ```
#[derive(Debug)]
pub struct Register<C, H, K> {
    catalog: Catalog,
    ledger: SaleLedger,
    history: HistoryStore,
    catalog_store: C,
    history_store: H,
    clock: K,
}

impl<C, H, K> Register<C, H, K>
where
    C: CatalogPersistence,
    H: HistoryPersistence,
    K: Clock,
{
    /// Loads catalog and history and starts with an empty sale.
    pub fn open(catalog_store: C, history_store: H, clock: K) -> Result<Self, PersistenceError> {
        let catalog = catalog_store.load()?;
        let history = HistoryStore::from_entries(history_store.load()?);

        Ok(Register {
            catalog,
            ledger: SaleLedger::new(),
            history,
            catalog_store,
            history_store,
            clock,
        })
    }

    // -------------------------------------------------------------------------
    // Sale
    // -------------------------------------------------------------------------

    /// Decodes `raw` and appends the item to the sale. Returns its index.
    ///
    /// `manual_weight` is only used for fixed codes.
    pub fn scan(&mut self, raw: &str, manual_weight: Weight) -> RegisterResult<usize> {
        let item = barcode::decode(raw, manual_weight, &self.catalog, self.clock.today())?;
        Ok(self.ledger.append(item))
    }

    pub fn remove_item(&mut self, index: usize) -> RegisterResult<LineItem> {
        Ok(self.ledger.remove_at(index)?)
    }

    /// Commits the current sale to the history.
    ///
    /// ## Protocol
    /// 1. Snapshot the ledger
    /// 2. Append to the history and persist; undo the append on failure
    /// 3. Clear the ledger
    ///
    /// Returns the committed items.
    pub fn finalize(&mut self) -> RegisterResult<Vec<LineItem>> {
        if self.ledger.is_empty() {
            return Err(LedgerError::EmptySale.into());
        }

        let sale = self.ledger.items().to_vec();
        let store = &self.history_store;
        self.history
            .append_with(sale.clone(), |all, new| store.append(all, new))?;

        self.ledger.clear();
        Ok(sale)
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    pub fn add_product(&mut self, code: &str, name: &str, price: Money) -> RegisterResult<Product> {
        self.mutate_catalog(|catalog| catalog.add(code, name, price).cloned())
    }

    /// Returns the previous price.
    pub fn update_price(&mut self, code: &str, price: Money) -> RegisterResult<Money> {
        self.mutate_catalog(|catalog| catalog.update_price(code, price))
    }

    /// Removes every listed code that exists. Returns the removed codes.
    pub fn delete_products<S: AsRef<str>>(&mut self, codes: &[S]) -> RegisterResult<Vec<ProductCode>> {
        if !codes.iter().any(|code| self.catalog.contains(code.as_ref())) {
            return Ok(Vec::new());
        }
        self.mutate_catalog(|catalog| Ok(catalog.remove(codes)))
    }

    /// Applies `f` to a copy of the catalog, saves the copy and only then
    /// swaps it in.
    fn mutate_catalog<T>(
        &mut self,
        f: impl FnOnce(&mut Catalog) -> Result<T, CatalogError>,
    ) -> RegisterResult<T> {
        let mut next = self.catalog.clone();
        let value = f(&mut next)?;
        self.catalog_store.save(&next)?;
        self.catalog = next;
        Ok(value)
    }

    // -------------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------------

    pub fn daily_report(&self, date: NaiveDate) -> DailyReport {
        DailyReport::build(self.history.entries(), date)
    }

    // -------------------------------------------------------------------------
    // Command protocol
    // -------------------------------------------------------------------------

    /// Runs one command and describes the resulting change.
    pub fn execute(&mut self, command: Command) -> RegisterResult<Outcome> {
        match command {
            Command::Scan { raw, manual_weight } => {
                let index = self.scan(&raw, manual_weight)?;
                let item = self.ledger.items()[index].clone();
                Ok(Outcome::ItemAdded {
                    index,
                    item,
                    total: self.ledger.total(),
                })
            }
            Command::RemoveItem { index } => {
                let item = self.remove_item(index)?;
                Ok(Outcome::ItemRemoved {
                    index,
                    item,
                    total: self.ledger.total(),
                })
            }
            Command::FinalizeSale => {
                let items = self.finalize()?;
                let total = items.iter().map(LineItem::subtotal).sum();
                Ok(Outcome::SaleFinalized { items, total })
            }
            Command::AddProduct { code, name, price } => {
                let product = self.add_product(&code, &name, price)?;
                Ok(Outcome::ProductAdded(product))
            }
            Command::UpdatePrice { code, price } => {
                let previous = self.update_price(&code, price)?;
                let code = ProductCode::parse(&code).map_err(CatalogError::from)?;
                Ok(Outcome::PriceUpdated {
                    code,
                    previous,
                    current: price,
                })
            }
            Command::DeleteProducts { codes } => {
                let removed = self.delete_products(codes.as_slice())?;
                Ok(Outcome::ProductsDeleted { removed })
            }
            Command::DailyReport { date } => {
                let date = date.unwrap_or_else(|| self.clock.today());
                Ok(Outcome::Report(self.daily_report(date)))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &SaleLedger {
        &self.ledger
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}

// =============================================================================
// Shared Register
// =============================================================================

/// A register shared between threads.
///
/// Every call takes the one lock, so catalog, ledger and history
/// operations never interleave.
#[derive(Debug)]
pub struct SharedRegister<C, H, K> {
    inner: Arc<Mutex<Register<C, H, K>>>,
}

impl<C, H, K> Clone for SharedRegister<C, H, K> {
    fn clone(&self) -> Self {
        SharedRegister {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, H, K> SharedRegister<C, H, K>
where
    C: CatalogPersistence,
    H: HistoryPersistence,
    K: Clock,
{
    pub fn new(register: Register<C, H, K>) -> Self {
        SharedRegister {
            inner: Arc::new(Mutex::new(register)),
        }
    }

    pub fn execute(&self, command: Command) -> RegisterResult<Outcome> {
        self.with_register_mut(|register| register.execute(command))
    }

    /// Runs `f` with read access to the register.
    pub fn with_register<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Register<C, H, K>) -> R,
    {
        let register = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&register)
    }

    /// Runs `f` with write access to the register.
    pub fn with_register_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Register<C, H, K>) -> R,
    {
        let mut register = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut register)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, ErrorCategory, RegisterError};
    use std::thread;

    type TestRegister = Register<InMemoryStore, InMemoryStore, FixedClock>;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn open() -> (TestRegister, InMemoryStore) {
        let mut catalog = Catalog::new();
        catalog.add("0001", "Lombinho", Money::from_cents(3990)).unwrap();
        catalog.add("0003", "Fato", Money::from_cents(2800)).unwrap();
        catalog.add("0010", "Baço", Money::from_cents(1600)).unwrap();

        let store = InMemoryStore::with_catalog(catalog);
        let register = Register::open(store.clone(), store.clone(), FixedClock(today())).unwrap();
        (register, store)
    }

    #[test]
    fn test_scan_appends_dated_item() {
        let (mut register, _) = open();

        let index = register.scan("0001", Weight::from_grams(1200)).unwrap();
        let index2 = register.scan("2000100123405", Weight::zero()).unwrap();

        assert_eq!((index, index2), (0, 1));
        let item = register.ledger().get(0).unwrap();
        assert_eq!(item.subtotal(), Money::from_cents(4788));
        assert_eq!(item.date(), today());
    }

    #[test]
    fn test_rejected_scan_leaves_ledger_unchanged() {
        let (mut register, _) = open();
        register.scan("0001", Weight::from_grams(1200)).unwrap();

        let err = register.scan("2009990123405", Weight::zero()).unwrap_err();
        assert!(matches!(
            err,
            RegisterError::Decode(DecodeError::UnknownProduct { .. })
        ));
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert_eq!(register.ledger().len(), 1);
    }

    #[test]
    fn test_finalize_moves_sale_to_history() {
        let (mut register, store) = open();
        register.scan("0001", Weight::from_grams(1200)).unwrap();
        register.scan("0003", Weight::from_grams(500)).unwrap();

        let sale = register.finalize().unwrap();

        assert_eq!(sale.len(), 2);
        assert!(register.ledger().is_empty());
        assert_eq!(register.history().entries(), sale.as_slice());
        assert_eq!(store.saved_history(), sale);
    }

    #[test]
    fn test_finalize_empty_sale_is_rejected() {
        let (mut register, store) = open();

        let err = register.finalize().unwrap_err();

        assert!(matches!(err, RegisterError::Ledger(LedgerError::EmptySale)));
        assert!(register.history().is_empty());
        assert!(store.saved_history().is_empty());
    }

    #[test]
    fn test_failed_finalize_changes_nothing() {
        let (mut register, store) = open();
        register.scan("0001", Weight::from_grams(1200)).unwrap();
        register.scan("0010", Weight::from_grams(250)).unwrap();
        let ledger_before = register.ledger().clone();

        store.set_fail_saves(true);
        let err = register.finalize().unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Persistence);
        assert_eq!(register.ledger(), &ledger_before);
        assert!(register.history().is_empty());

        // Storage is back: the same sale goes through.
        store.set_fail_saves(false);
        register.finalize().unwrap();
        assert_eq!(register.history().len(), 2);
        assert!(register.ledger().is_empty());
    }

    #[test]
    fn test_catalog_mutations_are_saved() {
        let (mut register, store) = open();

        register
            .add_product("0012", "Costela", Money::from_cents(2490))
            .unwrap();
        let previous = register.update_price("0001", Money::from_cents(4190)).unwrap();
        let removed = register.delete_products(&["0003", "0099"]).unwrap();

        assert_eq!(previous, Money::from_cents(3990));
        assert_eq!(removed, vec![ProductCode::parse("0003").unwrap()]);
        assert_eq!(&store.saved_catalog(), register.catalog());
        assert_eq!(register.catalog().len(), 3);
    }

    #[test]
    fn test_failed_catalog_save_rolls_back() {
        let (mut register, store) = open();
        let before = register.catalog().clone();
        store.set_fail_saves(true);

        let err = register
            .add_product("0012", "Costela", Money::from_cents(2490))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Persistence);

        register.update_price("0001", Money::from_cents(1)).unwrap_err();
        register.delete_products(&["0001"]).unwrap_err();

        assert_eq!(register.catalog(), &before);
    }

    #[test]
    fn test_price_update_does_not_touch_sold_items() {
        let (mut register, _) = open();
        register.scan("0001", Weight::from_grams(1000)).unwrap();
        register.finalize().unwrap();

        register.update_price("0001", Money::from_cents(9900)).unwrap();
        register.delete_products(&["0001"]).unwrap();

        let item = &register.history().entries()[0];
        assert_eq!(item.product_name(), "Lombinho");
        assert_eq!(item.subtotal(), Money::from_cents(3990));
    }

    #[test]
    fn test_execute_describes_changes() {
        let (mut register, _) = open();

        let outcome = register
            .execute(Command::Scan {
                raw: "0001".to_string(),
                manual_weight: Weight::from_grams(1200),
            })
            .unwrap();
        assert!(matches!(
            outcome,
            Outcome::ItemAdded { index: 0, total, .. } if total == Money::from_cents(4788)
        ));

        let outcome = register
            .execute(Command::UpdatePrice {
                code: "0003".to_string(),
                price: Money::from_cents(3000),
            })
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::PriceUpdated {
                code: ProductCode::parse("0003").unwrap(),
                previous: Money::from_cents(2800),
                current: Money::from_cents(3000),
            }
        );

        let outcome = register.execute(Command::FinalizeSale).unwrap();
        assert!(matches!(
            outcome,
            Outcome::SaleFinalized { ref items, total } if items.len() == 1 && total == Money::from_cents(4788)
        ));

        let outcome = register.execute(Command::DailyReport { date: None }).unwrap();
        match outcome {
            Outcome::Report(report) => {
                assert_eq!(report.date, today());
                assert_eq!(report.rows.len(), 1);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let err = register
            .execute(Command::RemoveItem { index: 0 })
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let outcome = Outcome::ProductsDeleted {
            removed: vec![ProductCode::parse("0003").unwrap()],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "products_deleted");
        assert_eq!(json["removed"][0], "0003");
    }

    #[test]
    fn test_outcome_json_names_integer_units() {
        let outcome = Outcome::PriceUpdated {
            code: ProductCode::parse("0001").unwrap(),
            previous: Money::from_cents(3990),
            current: Money::from_cents(4190),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["previous_cents"], 3990);
        assert_eq!(json["current_cents"], 4190);

        let product = Product::new(ProductCode::parse("0018").unwrap(), "Picanha", Money::from_cents(6990));
        let json = serde_json::to_value(Outcome::ProductAdded(product)).unwrap();
        assert_eq!(json["kind"], "product_added");
        assert_eq!(json["price_per_kg_cents"], 6990);
    }

    #[test]
    fn test_shared_register_serializes_scans() {
        let (register, _) = open();
        let shared = SharedRegister::new(register);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared
                            .execute(Command::Scan {
                                raw: "0010".to_string(),
                                manual_weight: Weight::from_grams(100),
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.with_register(|register| {
            assert_eq!(register.ledger().len(), 100);
            assert_eq!(register.ledger().total(), Money::from_cents(160 * 100));
        });
    }
}
