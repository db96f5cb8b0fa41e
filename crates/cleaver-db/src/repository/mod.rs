//! # Repository Module
//!
//! Async SQLite repositories.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteStore (blocking adapter)                                         │
//! │       │                                                                 │
//! │       │  db.products().replace_all(&catalog)                            │
//! │       │  db.sales().insert_sale(&items)                                 │
//! │       ▼                                                                 │
//! │  ProductRepository              SaleRepository                          │
//! │  ├── list / load_catalog        ├── insert_sale                         │
//! │  ├── count                      ├── list_all                            │
//! │  └── replace_all                └── replace_all                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog rows
//! - [`SaleRepository`](sale::SaleRepository) - Finalized sale lines

pub mod product;
pub mod sale;
