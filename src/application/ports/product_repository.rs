use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::catalog::product::Product;

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub display_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub is_on_sale: bool,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub is_on_sale: Option<bool>,
}

/// Catalog access. Every read here excludes soft-deleted rows; order
/// history is the one place deleted products still surface, and that join
/// lives in the order repository.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, new: &NewProduct) -> anyhow::Result<Product>;
    async fn list(&self) -> anyhow::Result<Vec<Product>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Product>>;
    async fn update(&self, id: Uuid, patch: &ProductPatch) -> anyhow::Result<Option<Product>>;
    /// Soft delete: stamps `deleted_at`. Returns false when the product is
    /// missing or already deleted.
    async fn soft_delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn exists(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Storefront reads: on-sale products only.
    async fn list_on_sale(&self) -> anyhow::Result<Vec<Product>>;
    async fn get_on_sale(&self, id: Uuid) -> anyhow::Result<Option<Product>>;
}
