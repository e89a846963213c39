use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::product_repository::{ProductPatch, ProductRepository};
use crate::application::validate;
use crate::domain::catalog::product::Product;

use super::{ProductValidationError, check_price};

pub struct UpdateProduct<'a, R: ProductRepository + ?Sized> {
    pub repo: &'a R,
}

/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    pub sku: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub is_on_sale: Option<bool>,
}

#[derive(Debug, Error)]
pub enum UpdateProductError {
    #[error(transparent)]
    Invalid(#[from] ProductValidationError),
    #[error(transparent)]
    Repo(#[from] anyhow::Error),
}

impl<'a, R: ProductRepository + ?Sized> UpdateProduct<'a, R> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<Option<Product>, UpdateProductError> {
        let mut patch = ProductPatch::default();
        if let Some(sku) = input.sku {
            patch.sku =
                Some(validate::non_empty_trimmed(&sku).ok_or(ProductValidationError::EmptySku)?);
        }
        if let Some(display_name) = input.display_name {
            patch.display_name = Some(
                validate::non_empty_trimmed(&display_name)
                    .ok_or(ProductValidationError::EmptyDisplayName)?,
            );
        }
        if let Some(description) = input.description {
            patch.description = validate::trimmed_or_none(Some(&description));
        }
        if let Some(price) = input.price {
            check_price(price)?;
            patch.price = Some(price);
        }
        patch.is_on_sale = input.is_on_sale;
        Ok(self.repo.update(id, &patch).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{MemProducts, dec};
    use super::*;

    #[tokio::test]
    async fn patches_only_the_provided_fields() {
        let repo = MemProducts::default();
        let seeded = repo.seed("MUG-01", dec("12.00"), false);

        let uc = UpdateProduct { repo: &repo };
        let input = UpdateProductInput {
            price: Some(dec("9.50")),
            is_on_sale: Some(true),
            ..Default::default()
        };
        let updated = uc.execute(seeded.id, input).await.unwrap().expect("found");

        assert_eq!(updated.sku, "MUG-01");
        assert_eq!(updated.price, dec("9.50"));
        assert!(updated.is_on_sale);
    }

    #[tokio::test]
    async fn validates_fields_that_are_present() {
        let repo = MemProducts::default();
        let seeded = repo.seed("MUG-01", dec("12.00"), false);
        let uc = UpdateProduct { repo: &repo };

        let err = uc
            .execute(
                seeded.id,
                UpdateProductInput {
                    sku: Some("   ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UpdateProductError::Invalid(ProductValidationError::EmptySku)
        ));

        let err = uc
            .execute(
                seeded.id,
                UpdateProductInput {
                    price: Some(dec("-2")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UpdateProductError::Invalid(ProductValidationError::InvalidPrice)
        ));
        assert_eq!(repo.get_live(seeded.id).unwrap().price, dec("12.00"));
    }

    #[tokio::test]
    async fn reports_missing_products_as_none() {
        let repo = MemProducts::default();
        let uc = UpdateProduct { repo: &repo };
        let got = uc
            .execute(uuid::Uuid::new_v4(), UpdateProductInput::default())
            .await
            .unwrap();
        assert!(got.is_none());
    }
}
