use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::order_repository::{NewOrder, OrderCreateError, OrderRepository};
use crate::domain::catalog::product::Product;
use crate::domain::orders::order::{Order, OrderDetail, OrderLine, OrderStatus};
use crate::domain::stock::ledger::{StockTransactionType, find_shortages};
use crate::infrastructure::db::PgPool;

use super::product_repository_sqlx::row_to_product;

const RESTOCK_NOTE: &str = "Stock restored due to order cancellation";

pub struct SqlxOrderRepository {
    pub pool: PgPool,
}

impl SqlxOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Items for a batch of orders, keyed by order id. Joins products
    /// without the soft-delete filter so history survives catalog removals.
    async fn items_for(&self, order_ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, Vec<OrderLine>>> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query(
            r#"SELECT oi.id, oi.order_id, oi.quantity, oi.unit_price, oi.created_at,
                      p.id AS product_id, p.sku, p.display_name, p.description, p.price,
                      p.is_on_sale, p.created_at AS product_created_at,
                      p.updated_at AS product_updated_at
               FROM order_items oi
               JOIN products p ON p.id = oi.product_id
               WHERE oi.order_id = ANY($1)
               ORDER BY oi.created_at"#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;
        let mut by_order: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
        for r in &rows {
            by_order
                .entry(r.get("order_id"))
                .or_default()
                .push(row_to_order_line(r));
        }
        Ok(by_order)
    }

    async fn detail_for(&self, order: Order) -> anyhow::Result<OrderDetail> {
        let mut items = self.items_for(&[order.id]).await?;
        let lines = items.remove(&order.id).unwrap_or_default();
        Ok(OrderDetail {
            order,
            items: lines,
        })
    }
}

impl From<sqlx::Error> for OrderCreateError {
    fn from(e: sqlx::Error) -> Self {
        OrderCreateError::Db(e.into())
    }
}

fn row_to_order(r: &PgRow) -> anyhow::Result<Order> {
    let raw_status: String = r.get("status");
    let status = OrderStatus::parse(&raw_status)
        .ok_or_else(|| anyhow::anyhow!("unknown order status: {raw_status}"))?;
    Ok(Order {
        id: r.get("id"),
        customer_name: r.get("customer_name"),
        customer_email: r.get("customer_email"),
        status,
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

fn row_to_order_line(r: &PgRow) -> OrderLine {
    OrderLine {
        id: r.get("id"),
        product: Product {
            id: r.get("product_id"),
            sku: r.get("sku"),
            display_name: r.get("display_name"),
            description: r.get("description"),
            price: r.get("price"),
            is_on_sale: r.get("is_on_sale"),
            created_at: r.get("product_created_at"),
            updated_at: r.get("product_updated_at"),
        },
        quantity: r.get("quantity"),
        unit_price: r.get("unit_price"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl OrderRepository for SqlxOrderRepository {
    async fn create(&self, new_order: &NewOrder) -> Result<OrderDetail, OrderCreateError> {
        let mut product_ids: Vec<Uuid> = Vec::new();
        for item in &new_order.items {
            if !product_ids.contains(&item.product_id) {
                product_ids.push(item.product_id);
            }
        }
        let requested: Vec<(Uuid, i32)> = new_order
            .items
            .iter()
            .map(|i| (i.product_id, i.quantity))
            .collect();

        let mut tx = self.pool.begin().await?;

        // Row locks hold off concurrent reservations until commit.
        let product_rows = sqlx::query(
            r#"SELECT id, sku, display_name, description, price, is_on_sale,
                      created_at, updated_at
               FROM products
               WHERE id = ANY($1) AND deleted_at IS NULL
               FOR UPDATE"#,
        )
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await?;
        let products: HashMap<Uuid, Product> = product_rows
            .iter()
            .map(|r| {
                let p = row_to_product(r);
                (p.id, p)
            })
            .collect();

        let missing: Vec<Uuid> = product_ids
            .iter()
            .filter(|id| !products.contains_key(id))
            .copied()
            .collect();
        if !missing.is_empty() {
            tx.rollback().await.ok();
            return Err(OrderCreateError::ProductsNotFound(missing));
        }

        let sum_rows = sqlx::query(
            r#"SELECT product_id, COALESCE(SUM(quantity), 0) AS total
               FROM stock_transactions
               WHERE product_id = ANY($1)
               GROUP BY product_id"#,
        )
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await?;
        let mut available: HashMap<Uuid, i64> = HashMap::new();
        for r in &sum_rows {
            available.insert(r.get("product_id"), r.get("total"));
        }

        let shortages = find_shortages(&available, &requested);
        if !shortages.is_empty() {
            tx.rollback().await.ok();
            return Err(OrderCreateError::InsufficientStock(shortages));
        }

        let order_row = sqlx::query(
            r#"INSERT INTO orders (customer_name, customer_email, status)
               VALUES ($1, $2, $3)
               RETURNING id, customer_name, customer_email, status, created_at, updated_at"#,
        )
        .bind(&new_order.customer_name)
        .bind(&new_order.customer_email)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await?;
        let order = row_to_order(&order_row)?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for line in &new_order.items {
            let product = products
                .get(&line.product_id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("locked product row vanished"))?;

            let item_row = sqlx::query(
                r#"INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                   VALUES ($1, $2, $3, $4)
                   RETURNING id, quantity, unit_price, created_at"#,
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(product.price)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"INSERT INTO stock_transactions (product_id, quantity, type, reference_id)
                   VALUES ($1, $2, $3, $4)"#,
            )
            .bind(line.product_id)
            .bind(-line.quantity)
            .bind(StockTransactionType::OutgoingOrder.as_str())
            .bind(order.id)
            .execute(&mut *tx)
            .await?;

            items.push(OrderLine {
                id: item_row.get("id"),
                product,
                quantity: item_row.get("quantity"),
                unit_price: item_row.get("unit_price"),
                created_at: item_row.get("created_at"),
            });
        }

        tx.commit().await?;
        Ok(OrderDetail { order, items })
    }

    async fn list(&self) -> anyhow::Result<Vec<OrderDetail>> {
        let rows = sqlx::query(
            r#"SELECT id, customer_name, customer_email, status, created_at, updated_at
               FROM orders
               WHERE deleted_at IS NULL
               ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        let orders: Vec<Order> = rows.iter().map(row_to_order).collect::<anyhow::Result<_>>()?;

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut items = self.items_for(&ids).await?;
        Ok(orders
            .into_iter()
            .map(|order| {
                let lines = items.remove(&order.id).unwrap_or_default();
                OrderDetail {
                    order,
                    items: lines,
                }
            })
            .collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<OrderDetail>> {
        let row = sqlx::query(
            r#"SELECT id, customer_name, customer_email, status, created_at, updated_at
               FROM orders
               WHERE id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(r) => Ok(Some(self.detail_for(row_to_order(&r)?).await?)),
            None => Ok(None),
        }
    }

    async fn lookup(&self, id: Uuid, email: &str) -> anyhow::Result<Option<OrderDetail>> {
        let row = sqlx::query(
            r#"SELECT id, customer_name, customer_email, status, created_at, updated_at
               FROM orders
               WHERE id = $1 AND customer_email = $2 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(r) => Ok(Some(self.detail_for(row_to_order(&r)?).await?)),
            None => Ok(None),
        }
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> anyhow::Result<Option<Order>> {
        let row = sqlx::query(
            r#"UPDATE orders SET status = $1, updated_at = now()
               WHERE id = $2 AND deleted_at IS NULL
               RETURNING id, customer_name, customer_email, status, created_at, updated_at"#,
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_order).transpose()
    }

    async fn cancel(&self, id: Uuid) -> anyhow::Result<Option<Order>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            r#"SELECT id, customer_name, customer_email, status, created_at, updated_at
               FROM orders
               WHERE id = $1 AND deleted_at IS NULL
               FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            tx.rollback().await.ok();
            return Ok(None);
        };
        let order = row_to_order(&row)?;

        // Concurrent cancellations serialize on the row lock; whoever comes
        // second sees CANCELLED and must not restore a second time.
        if order.status == OrderStatus::Cancelled {
            tx.rollback().await.ok();
            return Ok(Some(order));
        }

        let item_rows =
            sqlx::query("SELECT product_id, quantity FROM order_items WHERE order_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        for r in &item_rows {
            sqlx::query(
                r#"INSERT INTO stock_transactions (product_id, quantity, type, reference_id, notes)
                   VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(r.get::<Uuid, _>("product_id"))
            .bind(r.get::<i32, _>("quantity"))
            .bind(StockTransactionType::Adjustment.as_str())
            .bind(id)
            .bind(RESTOCK_NOTE)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query(
            r#"UPDATE orders SET status = $1, updated_at = now()
               WHERE id = $2
               RETURNING id, customer_name, customer_email, status, created_at, updated_at"#,
        )
        .bind(OrderStatus::Cancelled.as_str())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        let cancelled = row_to_order(&updated)?;
        tx.commit().await?;
        Ok(Some(cancelled))
    }
}
