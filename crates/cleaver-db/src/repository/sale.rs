//! # Sale Repository
//!
//! Sales history in the `sale_lines` table.
//!
//! ## Finalize Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Finalize → sale_lines                             │
//! │                                                                         │
//! │  Register::finalize()                                                   │
//! │     └── insert_sale(items)                                              │
//! │           BEGIN                                                         │
//! │             sale_id = uuid v4                                           │
//! │             INSERT (sale_id, 0, Lombinho, 1200 g, 3990, 4788, date)     │
//! │             INSERT (sale_id, 1, Fato,      500 g, 2800, 1400, date)     │
//! │           COMMIT          ← all lines or none                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use cleaver_core::{LineItem, Money, Weight};

use crate::error::{DbError, DbResult};

/// A `sale_lines` row as stored.
#[derive(Debug, FromRow)]
struct SaleLineRow {
    id: i64,
    product_name: String,
    weight_grams: i64,
    price_per_kg_cents: i64,
    subtotal_cents: i64,
    sale_date: NaiveDate,
}

impl TryFrom<SaleLineRow> for LineItem {
    type Error = DbError;

    /// Rebuilds the item and checks the stored subtotal against the
    /// recomputed one.
    fn try_from(row: SaleLineRow) -> DbResult<Self> {
        let item = LineItem::new(
            row.product_name,
            Weight::from_grams(row.weight_grams),
            Money::from_cents(row.price_per_kg_cents),
            row.sale_date,
        );

        if item.subtotal().cents() != row.subtotal_cents {
            return Err(DbError::corrupt(
                format!("sale line {}", row.id),
                format!(
                    "stored subtotal {} does not match {}",
                    Money::from_cents(row.subtotal_cents),
                    item.subtotal()
                ),
            ));
        }
        Ok(item)
    }
}

/// Repository for history rows.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts one finalized sale under a fresh sale id.
    ///
    /// ## Returns
    /// The sale id shared by the inserted lines.
    pub async fn insert_sale(&self, items: &[LineItem]) -> DbResult<Uuid> {
        let sale_id = Uuid::new_v4();
        debug!(sale_id = %sale_id, lines = items.len(), "Inserting sale");

        let mut tx = self.pool.begin().await?;
        insert_lines(&mut tx, &sale_id, items).await?;
        tx.commit().await?;

        Ok(sale_id)
    }

    /// Replaces the entire history in one transaction.
    ///
    /// Sale grouping is not part of a `LineItem`, so the rewritten lines
    /// share one new sale id.
    pub async fn replace_all(&self, items: &[LineItem]) -> DbResult<()> {
        let sale_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sale_lines")
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut tx, &sale_id, items).await?;

        tx.commit().await?;
        debug!(lines = items.len(), "Rewrote sales history");
        Ok(())
    }

    /// Every line ever finalized, in commit order.
    pub async fn list_all(&self) -> DbResult<Vec<LineItem>> {
        let rows: Vec<SaleLineRow> = sqlx::query_as(
            r#"
            SELECT id, product_name, weight_grams, price_per_kg_cents, subtotal_cents, sale_date
            FROM sale_lines
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LineItem::try_from).collect()
    }

}

async fn insert_lines(
    tx: &mut Transaction<'_, Sqlite>,
    sale_id: &Uuid,
    items: &[LineItem],
) -> DbResult<()> {
    let sale_id = sale_id.to_string();

    for (line_no, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO sale_lines (
                sale_id, line_no, product_name, weight_grams,
                price_per_kg_cents, subtotal_cents, sale_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale_id)
        .bind(line_no as i64)
        .bind(item.product_name())
        .bind(item.weight())
        .bind(item.price_per_kg())
        .bind(item.subtotal())
        .bind(item.date())
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
