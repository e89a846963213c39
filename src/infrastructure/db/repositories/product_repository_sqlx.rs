use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::product_repository::{NewProduct, ProductPatch, ProductRepository};
use crate::domain::catalog::product::Product;
use crate::infrastructure::db::PgPool;

/// Catalog rows are soft deleted; every read here filters on
/// `deleted_at IS NULL`. Order history joins the table directly and keeps
/// seeing deleted rows.
pub struct SqlxProductRepository {
    pub pool: PgPool,
}

impl SqlxProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_product(r: &PgRow) -> Product {
    Product {
        id: r.get("id"),
        sku: r.get("sku"),
        display_name: r.get("display_name"),
        description: r.get("description"),
        price: r.get("price"),
        is_on_sale: r.get("is_on_sale"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

#[async_trait]
impl ProductRepository for SqlxProductRepository {
    async fn create(&self, new_product: &NewProduct) -> anyhow::Result<Product> {
        let row = sqlx::query(
            r#"INSERT INTO products (sku, display_name, description, price, is_on_sale)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, sku, display_name, description, price, is_on_sale,
                         created_at, updated_at"#,
        )
        .bind(&new_product.sku)
        .bind(&new_product.display_name)
        .bind(&new_product.description)
        .bind(new_product.price)
        .bind(new_product.is_on_sale)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_product(&row))
    }

    async fn list(&self) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"SELECT id, sku, display_name, description, price, is_on_sale,
                      created_at, updated_at
               FROM products
               WHERE deleted_at IS NULL
               ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_product).collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query(
            r#"SELECT id, sku, display_name, description, price, is_on_sale,
                      created_at, updated_at
               FROM products
               WHERE id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(row_to_product))
    }

    async fn update(&self, id: Uuid, patch: &ProductPatch) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query(
            r#"UPDATE products SET
                   sku = COALESCE($1, sku),
                   display_name = COALESCE($2, display_name),
                   description = COALESCE($3, description),
                   price = COALESCE($4, price),
                   is_on_sale = COALESCE($5, is_on_sale),
                   updated_at = now()
               WHERE id = $6 AND deleted_at IS NULL
               RETURNING id, sku, display_name, description, price, is_on_sale,
                         created_at, updated_at"#,
        )
        .bind(patch.sku.as_deref())
        .bind(patch.display_name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .bind(patch.is_on_sale)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(row_to_product))
    }

    async fn soft_delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            "UPDATE products SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn exists(&self, id: Uuid) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_on_sale(&self) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"SELECT id, sku, display_name, description, price, is_on_sale,
                      created_at, updated_at
               FROM products
               WHERE is_on_sale = TRUE AND deleted_at IS NULL
               ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_product).collect())
    }

    async fn get_on_sale(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query(
            r#"SELECT id, sku, display_name, description, price, is_on_sale,
                      created_at, updated_at
               FROM products
               WHERE id = $1 AND is_on_sale = TRUE AND deleted_at IS NULL"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(row_to_product))
    }
}
