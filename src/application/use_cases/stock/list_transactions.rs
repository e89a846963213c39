use uuid::Uuid;

use crate::application::ports::product_repository::ProductRepository;
use crate::application::ports::stock_repository::StockRepository;
use crate::domain::stock::ledger::StockTransaction;

/// Movement history for one product, newest first.
pub struct ListStockTransactions<'a, P, S>
where
    P: ProductRepository + ?Sized,
    S: StockRepository + ?Sized,
{
    pub products: &'a P,
    pub stock: &'a S,
}

impl<'a, P, S> ListStockTransactions<'a, P, S>
where
    P: ProductRepository + ?Sized,
    S: StockRepository + ?Sized,
{
    pub async fn execute(&self, product_id: Uuid) -> anyhow::Result<Option<Vec<StockTransaction>>> {
        if !self.products.exists(product_id).await? {
            return Ok(None);
        }
        Ok(Some(self.stock.transactions_for(product_id).await?))
    }
}
