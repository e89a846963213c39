use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::orders::order::{Order, OrderDetail, OrderStatus};
use crate::domain::stock::ledger::StockShortage;

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: Option<String>,
    pub customer_email: String,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(thiserror::Error, Debug)]
pub enum OrderCreateError {
    #[error("products not found")]
    ProductsNotFound(Vec<Uuid>),
    #[error("insufficient stock for one or more items")]
    InsufficientStock(Vec<StockShortage>),
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Places an order atomically: locks the referenced products, verifies
    /// they all exist and have aggregate stock for every line, then inserts
    /// the order, its items (with unit_price snapshots) and one negative
    /// OUTGOING_ORDER ledger row per line. Nothing is written on failure.
    async fn create(&self, new_order: &NewOrder) -> Result<OrderDetail, OrderCreateError>;

    /// Non-deleted orders, newest first, items included.
    async fn list(&self) -> anyhow::Result<Vec<OrderDetail>>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<OrderDetail>>;

    /// Customer self-service: order by id and exact customer email.
    async fn lookup(&self, id: Uuid, email: &str) -> anyhow::Result<Option<OrderDetail>>;

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> anyhow::Result<Option<Order>>;

    /// Cancels an order and restores its stock in one transaction: one
    /// compensating positive ADJUSTMENT row per item, referencing the
    /// order. The original OUTGOING_ORDER rows are left untouched, and an
    /// order already CANCELLED is returned as-is without another restore.
    async fn cancel(&self, id: Uuid) -> anyhow::Result<Option<Order>>;
}
