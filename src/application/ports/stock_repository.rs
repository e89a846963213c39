use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::stock::ledger::{StockTransaction, StockTransactionType};

#[derive(Debug, Clone)]
pub struct NewStockTransaction {
    pub product_id: Uuid,
    pub quantity: i32,
    pub tx_type: StockTransactionType,
    pub reference_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum StockDeductError {
    #[error("product not found")]
    ProductNotFound,
    #[error("insufficient stock: available {available}, requested {requested}")]
    Insufficient { available: i64, requested: i64 },
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Appends a ledger row. Callers are responsible for checking the
    /// product exists; deductions must go through `deduct` instead.
    async fn insert(&self, tx: &NewStockTransaction) -> anyhow::Result<StockTransaction>;

    /// Removes `quantity` (positive) units within one database transaction:
    /// locks the product row, sums the ledger, and refuses to let the sum
    /// go negative. Writes a negative ADJUSTMENT row on success.
    async fn deduct(
        &self,
        product_id: Uuid,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<StockTransaction, StockDeductError>;

    /// Current stock: ledger sum, 0 when the product has no rows.
    async fn level(&self, product_id: Uuid) -> anyhow::Result<i64>;

    /// Ledger rows for a product, newest first.
    async fn transactions_for(&self, product_id: Uuid) -> anyhow::Result<Vec<StockTransaction>>;
}
