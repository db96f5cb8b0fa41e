//! # Product Repository
//!
//! Catalog storage in the `products` table.
//!
//! ## Catalog Save
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  replace_all(catalog)                                                   │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    DELETE FROM products                                                 │
//! │    INSERT 0001 Lombinho 3990                                            │
//! │    INSERT 0002 Fraldinha 4250                                           │
//! │    ...                                                                  │
//! │  COMMIT            ← any failure rolls back to the previous catalog     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use cleaver_core::{Catalog, Money, Product, ProductCode};

use crate::error::{DbError, DbResult};

/// A `products` row as stored.
#[derive(Debug, FromRow)]
struct ProductRow {
    code: String,
    name: String,
    price_per_kg_cents: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        let code = ProductCode::parse(&row.code)
            .map_err(|e| DbError::corrupt(format!("product '{}'", row.code), e.to_string()))?;
        Ok(Product::new(code, row.name, Money::from_cents(row.price_per_kg_cents)))
    }
}

/// Repository for catalog rows.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let catalog = repo.load_catalog().await?;
/// repo.replace_all(&catalog).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// All products, ascending by code.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT code, name, price_per_kg_cents
            FROM products
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Loads the whole table as a catalog.
    pub async fn load_catalog(&self) -> DbResult<Catalog> {
        let products = self.list().await?;
        debug!(count = products.len(), "Loaded catalog from database");
        Ok(Catalog::from_products(products))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Replaces the table contents with `catalog` in one transaction.
    pub async fn replace_all(&self, catalog: &Catalog) -> DbResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM products")
            .execute(&mut *tx)
            .await?;

        for product in catalog.products() {
            sqlx::query(
                r#"
                INSERT INTO products (code, name, price_per_kg_cents, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&product.code)
            .bind(&product.name)
            .bind(product.price_per_kg)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(count = catalog.len(), "Saved catalog to database");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(code: &str, name: &str, cents: i64) -> Product {
        Product::new(ProductCode::parse(code).unwrap(), name, Money::from_cents(cents))
    }

    fn catalog(products: &[(&str, &str, i64)]) -> Catalog {
        Catalog::from_products(
            products
                .iter()
                .map(|(code, name, cents)| product(code, name, *cents)),
        )
    }

    #[tokio::test]
    async fn test_replace_all_then_list_by_code() {
        let db = db().await;
        let repo = db.products();

        repo.replace_all(&catalog(&[("0017", "Carne Moída", 3500), ("0001", "Lombinho", 3990)]))
            .await
            .unwrap();

        let codes: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.code.to_string())
            .collect();
        assert_eq!(codes, vec!["0001", "0017"]);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_replace_all_drops_stale_rows() {
        let db = db().await;
        let repo = db.products();
        repo.replace_all(&catalog(&[("0042", "Stale", 100)])).await.unwrap();

        let mut catalog = Catalog::new();
        catalog.add("0001", "Lombinho", Money::from_cents(3990)).unwrap();
        catalog.add("0004", "Coração", Money::from_cents(2990)).unwrap();

        repo.replace_all(&catalog).await.unwrap();

        assert_eq!(repo.load_catalog().await.unwrap(), catalog);
    }

    #[tokio::test]
    async fn test_check_constraint_rolls_back_whole_save() {
        let db = db().await;
        let repo = db.products();
        let before = catalog(&[("0001", "Lombinho", 3990)]);
        repo.replace_all(&before).await.unwrap();

        let err = repo
            .replace_all(&catalog(&[("0002", "Fraldinha", 4250), ("0003", "Fato", 0)]))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::QueryFailed(_)));
        assert_eq!(repo.load_catalog().await.unwrap(), before);
    }
}
