use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::stock_repository::{
    NewStockTransaction, StockDeductError, StockRepository,
};
use crate::domain::stock::ledger::{StockTransaction, StockTransactionType};
use crate::infrastructure::db::PgPool;

pub struct SqlxStockRepository {
    pub pool: PgPool,
}

impl SqlxStockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StockDeductError {
    fn from(e: sqlx::Error) -> Self {
        StockDeductError::Db(e.into())
    }
}

pub(crate) fn row_to_stock_tx(r: &PgRow) -> anyhow::Result<StockTransaction> {
    let raw_type: String = r.get("type");
    let tx_type = StockTransactionType::parse(&raw_type)
        .ok_or_else(|| anyhow::anyhow!("unknown stock transaction type: {raw_type}"))?;
    Ok(StockTransaction {
        id: r.get("id"),
        product_id: r.get("product_id"),
        quantity: r.get("quantity"),
        tx_type,
        reference_id: r.get("reference_id"),
        notes: r.get("notes"),
        created_at: r.get("created_at"),
    })
}

#[async_trait]
impl StockRepository for SqlxStockRepository {
    async fn insert(&self, tx: &NewStockTransaction) -> anyhow::Result<StockTransaction> {
        let row = sqlx::query(
            r#"INSERT INTO stock_transactions (product_id, quantity, type, reference_id, notes)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, product_id, quantity, type, reference_id, notes, created_at"#,
        )
        .bind(tx.product_id)
        .bind(tx.quantity)
        .bind(tx.tx_type.as_str())
        .bind(tx.reference_id)
        .bind(&tx.notes)
        .fetch_one(&self.pool)
        .await?;
        row_to_stock_tx(&row)
    }

    async fn deduct(
        &self,
        product_id: Uuid,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<StockTransaction, StockDeductError> {
        let mut tx = self.pool.begin().await?;
        let product = sqlx::query(
            "SELECT id FROM products WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;
        if product.is_none() {
            tx.rollback().await.ok();
            return Err(StockDeductError::ProductNotFound);
        }

        let available: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM stock_transactions WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;
        if available < quantity as i64 {
            tx.rollback().await.ok();
            return Err(StockDeductError::Insufficient {
                available,
                requested: quantity as i64,
            });
        }

        let row = sqlx::query(
            r#"INSERT INTO stock_transactions (product_id, quantity, type, notes)
               VALUES ($1, $2, $3, $4)
               RETURNING id, product_id, quantity, type, reference_id, notes, created_at"#,
        )
        .bind(product_id)
        .bind(-quantity)
        .bind(StockTransactionType::Adjustment.as_str())
        .bind(&notes)
        .fetch_one(&mut *tx)
        .await?;
        let inserted = row_to_stock_tx(&row)?;
        tx.commit().await?;
        Ok(inserted)
    }

    async fn level(&self, product_id: Uuid) -> anyhow::Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM stock_transactions WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn transactions_for(&self, product_id: Uuid) -> anyhow::Result<Vec<StockTransaction>> {
        let rows = sqlx::query(
            r#"SELECT id, product_id, quantity, type, reference_id, notes, created_at
               FROM stock_transactions
               WHERE product_id = $1
               ORDER BY created_at DESC"#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_stock_tx).collect()
    }
}
