use rust_decimal::Decimal;
use thiserror::Error;

use crate::application::ports::product_repository::{NewProduct, ProductRepository};
use crate::application::validate;
use crate::domain::catalog::product::Product;

use super::{ProductValidationError, check_price};

pub struct CreateProduct<'a, R: ProductRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub sku: String,
    pub display_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub is_on_sale: Option<bool>,
}

#[derive(Debug, Error)]
pub enum CreateProductError {
    #[error(transparent)]
    Invalid(#[from] ProductValidationError),
    #[error(transparent)]
    Repo(#[from] anyhow::Error),
}

impl<'a, R: ProductRepository + ?Sized> CreateProduct<'a, R> {
    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, CreateProductError> {
        let sku =
            validate::non_empty_trimmed(&input.sku).ok_or(ProductValidationError::EmptySku)?;
        let display_name = validate::non_empty_trimmed(&input.display_name)
            .ok_or(ProductValidationError::EmptyDisplayName)?;
        check_price(input.price)?;
        let new_product = NewProduct {
            sku,
            display_name,
            description: validate::trimmed_or_none(input.description.as_deref()),
            price: input.price,
            is_on_sale: input.is_on_sale.unwrap_or(false),
        };
        Ok(self.repo.create(&new_product).await?)
    }
}
