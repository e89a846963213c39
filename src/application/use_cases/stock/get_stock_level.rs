use uuid::Uuid;

use crate::application::ports::product_repository::ProductRepository;
use crate::application::ports::stock_repository::StockRepository;

pub struct GetStockLevel<'a, P, S>
where
    P: ProductRepository + ?Sized,
    S: StockRepository + ?Sized,
{
    pub products: &'a P,
    pub stock: &'a S,
}

impl<'a, P, S> GetStockLevel<'a, P, S>
where
    P: ProductRepository + ?Sized,
    S: StockRepository + ?Sized,
{
    /// `None` when the product does not exist; a product with no ledger
    /// rows reports 0.
    pub async fn execute(&self, product_id: Uuid) -> anyhow::Result<Option<i64>> {
        if !self.products.exists(product_id).await? {
            return Ok(None);
        }
        Ok(Some(self.stock.level(product_id).await?))
    }
}

#[cfg(test)]
mod tests {
    use crate::application::use_cases::products::testing::{MemProducts, dec};
    use crate::application::use_cases::stock::testing::MemLedger;
    use crate::domain::stock::ledger::StockTransactionType;

    use super::*;

    #[tokio::test]
    async fn sums_the_ledger_and_defaults_to_zero() {
        let products = MemProducts::default();
        let ledger = MemLedger::default();
        let product = products.seed("TEE-01", dec("20.00"), true);

        let uc = GetStockLevel {
            products: &products,
            stock: &ledger,
        };
        assert_eq!(uc.execute(product.id).await.unwrap(), Some(0));

        ledger.append(product.id, 10, StockTransactionType::Incoming, None, None);
        ledger.append(
            product.id,
            -4,
            StockTransactionType::OutgoingOrder,
            None,
            None,
        );
        ledger.append(product.id, 1, StockTransactionType::Adjustment, None, None);
        assert_eq!(uc.execute(product.id).await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn unknown_products_have_no_level() {
        let products = MemProducts::default();
        let ledger = MemLedger::default();
        let uc = GetStockLevel {
            products: &products,
            stock: &ledger,
        };
        assert_eq!(uc.execute(Uuid::new_v4()).await.unwrap(), None);
    }
}
