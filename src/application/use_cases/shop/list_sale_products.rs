use crate::application::ports::product_repository::ProductRepository;
use crate::domain::catalog::product::Product;

/// The storefront only ever sees products flagged as on sale.
pub struct ListSaleProducts<'a, R: ProductRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ProductRepository + ?Sized> ListSaleProducts<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<Product>> {
        self.repo.list_on_sale().await
    }
}

#[cfg(test)]
mod tests {
    use crate::application::use_cases::products::testing::{MemProducts, dec};

    use super::*;

    #[tokio::test]
    async fn hides_off_sale_and_deleted_products() {
        let repo = MemProducts::default();
        let on_sale = repo.seed("TEE-01", dec("20.00"), true);
        repo.seed("TEE-02", dec("22.00"), false);
        let pulled = repo.seed("TEE-03", dec("25.00"), true);
        repo.soft_delete(pulled.id).await.unwrap();

        let uc = ListSaleProducts { repo: &repo };
        let listed = uc.execute().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, on_sale.id);
    }
}
