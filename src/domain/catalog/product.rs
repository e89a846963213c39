use rust_decimal::Decimal;
use uuid::Uuid;

/// Catalog item. Soft-deleted rows never leave the repository layer, so a
/// `Product` in hand is always a live one.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub display_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub is_on_sale: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
