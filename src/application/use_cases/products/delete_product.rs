use uuid::Uuid;

use crate::application::ports::product_repository::ProductRepository;

pub struct DeleteProduct<'a, R: ProductRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ProductRepository + ?Sized> DeleteProduct<'a, R> {
    /// Soft delete. Ledger history and order lines keep pointing at the row.
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<bool> {
        self.repo.soft_delete(id).await
    }
}
