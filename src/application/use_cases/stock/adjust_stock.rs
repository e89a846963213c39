use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::product_repository::ProductRepository;
use crate::application::ports::stock_repository::{
    NewStockTransaction, StockDeductError, StockRepository,
};
use crate::application::validate;
use crate::domain::stock::ledger::{StockTransaction, StockTransactionType};

/// Manual correction. Positive quantities append directly; negative ones go
/// through the locked deduction path so stock cannot be driven below zero.
pub struct AdjustStock<'a, P, S>
where
    P: ProductRepository + ?Sized,
    S: StockRepository + ?Sized,
{
    pub products: &'a P,
    pub stock: &'a S,
}

#[derive(Debug, Clone)]
pub struct AdjustStockInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Error)]
pub enum AdjustStockError {
    #[error("quantity must not be zero")]
    ZeroQuantity,
    #[error("product not found")]
    ProductNotFound,
    #[error("insufficient stock: available {available}, requested {requested}")]
    Insufficient { available: i64, requested: i64 },
    #[error(transparent)]
    Repo(#[from] anyhow::Error),
}

impl<'a, P, S> AdjustStock<'a, P, S>
where
    P: ProductRepository + ?Sized,
    S: StockRepository + ?Sized,
{
    pub async fn execute(
        &self,
        input: AdjustStockInput,
    ) -> Result<StockTransaction, AdjustStockError> {
        if input.quantity == 0 {
            return Err(AdjustStockError::ZeroQuantity);
        }
        let notes = validate::trimmed_or_none(input.notes.as_deref());
        if input.quantity < 0 {
            return match self
                .stock
                .deduct(input.product_id, input.quantity.saturating_abs(), notes)
                .await
            {
                Ok(tx) => Ok(tx),
                Err(StockDeductError::ProductNotFound) => Err(AdjustStockError::ProductNotFound),
                Err(StockDeductError::Insufficient {
                    available,
                    requested,
                }) => Err(AdjustStockError::Insufficient {
                    available,
                    requested,
                }),
                Err(StockDeductError::Db(e)) => Err(AdjustStockError::Repo(e)),
            };
        }
        if !self.products.exists(input.product_id).await? {
            return Err(AdjustStockError::ProductNotFound);
        }
        let tx = NewStockTransaction {
            product_id: input.product_id,
            quantity: input.quantity,
            tx_type: StockTransactionType::Adjustment,
            reference_id: None,
            notes,
        };
        Ok(self.stock.insert(&tx).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::application::use_cases::products::testing::{MemProducts, dec};
    use crate::application::use_cases::stock::testing::MemLedger;

    use super::*;

    fn fixture() -> (MemProducts, MemLedger) {
        (MemProducts::default(), MemLedger::default())
    }

    #[tokio::test]
    async fn positive_adjustments_append_directly() {
        let (products, ledger) = fixture();
        let product = products.seed("MUG-01", dec("12.00"), false);
        ledger.track(product.id);

        let uc = AdjustStock {
            products: &products,
            stock: &ledger,
        };
        let tx = uc
            .execute(AdjustStockInput {
                product_id: product.id,
                quantity: 7,
                notes: Some("recount".into()),
            })
            .await
            .unwrap();

        assert_eq!(tx.quantity, 7);
        assert_eq!(tx.tx_type, StockTransactionType::Adjustment);
        assert_eq!(ledger.sum_for(product.id), 7);
    }

    #[tokio::test]
    async fn negative_adjustments_cannot_overdraw() {
        let (products, ledger) = fixture();
        let product = products.seed("MUG-01", dec("12.00"), false);
        ledger.track(product.id);
        ledger.append(product.id, 3, StockTransactionType::Incoming, None, None);

        let uc = AdjustStock {
            products: &products,
            stock: &ledger,
        };

        let err = uc
            .execute(AdjustStockInput {
                product_id: product.id,
                quantity: -5,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdjustStockError::Insufficient {
                available: 3,
                requested: 5
            }
        ));
        assert_eq!(ledger.sum_for(product.id), 3);

        let tx = uc
            .execute(AdjustStockInput {
                product_id: product.id,
                quantity: -2,
                notes: Some("breakage".into()),
            })
            .await
            .unwrap();
        assert_eq!(tx.quantity, -2);
        assert_eq!(ledger.sum_for(product.id), 1);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_before_touching_the_ledger() {
        let (products, ledger) = fixture();
        let product = products.seed("MUG-01", dec("12.00"), false);
        ledger.track(product.id);

        let uc = AdjustStock {
            products: &products,
            stock: &ledger,
        };
        let err = uc
            .execute(AdjustStockInput {
                product_id: product.id,
                quantity: 0,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AdjustStockError::ZeroQuantity));
        assert_eq!(ledger.row_count(), 0);
    }

    #[tokio::test]
    async fn unknown_products_are_reported_for_both_signs() {
        let (products, ledger) = fixture();
        let uc = AdjustStock {
            products: &products,
            stock: &ledger,
        };

        for quantity in [4, -4] {
            let err = uc
                .execute(AdjustStockInput {
                    product_id: Uuid::new_v4(),
                    quantity,
                    notes: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, AdjustStockError::ProductNotFound));
        }
    }
}
