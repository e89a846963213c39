use uuid::Uuid;

use crate::application::ports::product_repository::ProductRepository;
use crate::domain::catalog::product::Product;

pub struct GetSaleProduct<'a, R: ProductRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ProductRepository + ?Sized> GetSaleProduct<'a, R> {
    /// `None` covers unknown, deleted and off-sale products alike.
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        self.repo.get_on_sale(id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::application::use_cases::products::testing::{MemProducts, dec};

    use super::*;

    #[tokio::test]
    async fn off_sale_products_look_missing_to_the_storefront() {
        let repo = MemProducts::default();
        let hidden = repo.seed("POSTER-01", dec("8.00"), false);
        let visible = repo.seed("POSTER-02", dec("8.00"), true);

        let uc = GetSaleProduct { repo: &repo };
        assert!(uc.execute(hidden.id).await.unwrap().is_none());
        assert_eq!(
            uc.execute(visible.id).await.unwrap().map(|p| p.id),
            Some(visible.id)
        );
    }
}
