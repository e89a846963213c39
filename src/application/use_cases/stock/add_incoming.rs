use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::product_repository::ProductRepository;
use crate::application::ports::stock_repository::{NewStockTransaction, StockRepository};
use crate::application::validate;
use crate::domain::stock::ledger::{StockTransaction, StockTransactionType};

/// Receives goods: appends a positive INCOMING row for an existing product.
pub struct AddIncomingStock<'a, P, S>
where
    P: ProductRepository + ?Sized,
    S: StockRepository + ?Sized,
{
    pub products: &'a P,
    pub stock: &'a S,
}

#[derive(Debug, Clone)]
pub struct AddIncomingInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Error)]
pub enum AddIncomingError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("product not found")]
    ProductNotFound,
    #[error(transparent)]
    Repo(#[from] anyhow::Error),
}

impl<'a, P, S> AddIncomingStock<'a, P, S>
where
    P: ProductRepository + ?Sized,
    S: StockRepository + ?Sized,
{
    pub async fn execute(
        &self,
        input: AddIncomingInput,
    ) -> Result<StockTransaction, AddIncomingError> {
        if input.quantity < 1 {
            return Err(AddIncomingError::InvalidQuantity);
        }
        if !self.products.exists(input.product_id).await? {
            return Err(AddIncomingError::ProductNotFound);
        }
        let tx = NewStockTransaction {
            product_id: input.product_id,
            quantity: input.quantity,
            tx_type: StockTransactionType::Incoming,
            reference_id: None,
            notes: validate::trimmed_or_none(input.notes.as_deref()),
        };
        Ok(self.stock.insert(&tx).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::application::use_cases::products::testing::{MemProducts, dec};
    use crate::application::use_cases::stock::testing::MemLedger;

    use super::*;

    #[tokio::test]
    async fn records_a_positive_incoming_row() {
        let products = MemProducts::default();
        let ledger = MemLedger::default();
        let product = products.seed("TEE-01", dec("20.00"), true);

        let uc = AddIncomingStock {
            products: &products,
            stock: &ledger,
        };
        let tx = uc
            .execute(AddIncomingInput {
                product_id: product.id,
                quantity: 25,
                notes: Some("  first delivery  ".into()),
            })
            .await
            .unwrap();

        assert_eq!(tx.quantity, 25);
        assert_eq!(tx.tx_type, StockTransactionType::Incoming);
        assert_eq!(tx.notes.as_deref(), Some("first delivery"));
        assert_eq!(ledger.sum_for(product.id), 25);
    }

    #[tokio::test]
    async fn rejects_quantities_below_one() {
        let products = MemProducts::default();
        let ledger = MemLedger::default();
        let product = products.seed("TEE-01", dec("20.00"), true);

        let uc = AddIncomingStock {
            products: &products,
            stock: &ledger,
        };
        for bad in [0, -4] {
            let err = uc
                .execute(AddIncomingInput {
                    product_id: product.id,
                    quantity: bad,
                    notes: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, AddIncomingError::InvalidQuantity));
        }
        assert_eq!(ledger.row_count(), 0);
    }

    #[tokio::test]
    async fn unknown_products_take_no_stock() {
        let products = MemProducts::default();
        let ledger = MemLedger::default();

        let uc = AddIncomingStock {
            products: &products,
            stock: &ledger,
        };
        let err = uc
            .execute(AddIncomingInput {
                product_id: Uuid::new_v4(),
                quantity: 5,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AddIncomingError::ProductNotFound));
        assert_eq!(ledger.row_count(), 0);
    }
}
