pub mod create_product;
pub mod delete_product;
pub mod get_product;
pub mod list_products;
pub mod update_product;

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductValidationError {
    #[error("sku must not be empty")]
    EmptySku,
    #[error("display_name must not be empty")]
    EmptyDisplayName,
    #[error("price must be positive with at most two decimal places")]
    InvalidPrice,
}

/// Prices are money; the ledger snapshots them into order lines verbatim.
pub(crate) fn check_price(price: Decimal) -> Result<(), ProductValidationError> {
    if price <= Decimal::ZERO || price.scale() > 2 {
        return Err(ProductValidationError::InvalidPrice);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::application::ports::product_repository::{
        NewProduct, ProductPatch, ProductRepository,
    };
    use crate::domain::catalog::product::Product;

    /// In-memory catalog shared by the use-case tests.
    #[derive(Default)]
    pub(crate) struct MemProducts {
        rows: Mutex<Vec<(Product, bool)>>,
    }

    impl MemProducts {
        pub(crate) fn seed(&self, sku: &str, price: Decimal, is_on_sale: bool) -> Product {
            let now = Utc::now();
            let product = Product {
                id: Uuid::new_v4(),
                sku: sku.to_string(),
                display_name: format!("{sku} (display)"),
                description: None,
                price,
                is_on_sale,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push((product.clone(), false));
            product
        }

        pub(crate) fn get_live(&self, id: Uuid) -> Option<Product> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|(p, deleted)| p.id == id && !deleted)
                .map(|(p, _)| p.clone())
        }

        pub(crate) fn is_deleted(&self, id: Uuid) -> bool {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .any(|(p, deleted)| p.id == id && *deleted)
        }
    }

    #[async_trait]
    impl ProductRepository for MemProducts {
        async fn create(&self, new_product: &NewProduct) -> anyhow::Result<Product> {
            let now = Utc::now();
            let product = Product {
                id: Uuid::new_v4(),
                sku: new_product.sku.clone(),
                display_name: new_product.display_name.clone(),
                description: new_product.description.clone(),
                price: new_product.price,
                is_on_sale: new_product.is_on_sale,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push((product.clone(), false));
            Ok(product)
        }

        async fn list(&self) -> anyhow::Result<Vec<Product>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|(_, deleted)| !deleted)
                .map(|(p, _)| p.clone())
                .collect())
        }

        async fn get(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
            Ok(self.get_live(id))
        }

        async fn update(&self, id: Uuid, patch: &ProductPatch) -> anyhow::Result<Option<Product>> {
            let mut rows = self.rows.lock().unwrap();
            let Some((product, _)) = rows
                .iter_mut()
                .find(|(p, deleted)| p.id == id && !deleted)
            else {
                return Ok(None);
            };
            if let Some(sku) = &patch.sku {
                product.sku = sku.clone();
            }
            if let Some(display_name) = &patch.display_name {
                product.display_name = display_name.clone();
            }
            if let Some(description) = &patch.description {
                product.description = Some(description.clone());
            }
            if let Some(price) = patch.price {
                product.price = price;
            }
            if let Some(is_on_sale) = patch.is_on_sale {
                product.is_on_sale = is_on_sale;
            }
            product.updated_at = Utc::now();
            Ok(Some(product.clone()))
        }

        async fn soft_delete(&self, id: Uuid) -> anyhow::Result<bool> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|(p, deleted)| p.id == id && !deleted) {
                Some(row) => {
                    row.1 = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn exists(&self, id: Uuid) -> anyhow::Result<bool> {
            Ok(self.get_live(id).is_some())
        }

        async fn list_on_sale(&self) -> anyhow::Result<Vec<Product>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|(p, deleted)| !deleted && p.is_on_sale)
                .map(|(p, _)| p.clone())
                .collect())
        }

        async fn get_on_sale(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
            Ok(self.get_live(id).filter(|p| p.is_on_sale))
        }
    }

    pub(crate) fn dec(raw: &str) -> Decimal {
        raw.parse().expect("decimal literal")
    }
}
