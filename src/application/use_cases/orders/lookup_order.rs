use uuid::Uuid;

use crate::application::ports::order_repository::OrderRepository;
use crate::domain::orders::order::OrderDetail;

/// Unauthenticated order lookup. The id alone is not enough; the caller
/// must also present the email the order was placed under.
pub struct LookupOrder<'a, R: OrderRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: OrderRepository + ?Sized> LookupOrder<'a, R> {
    pub async fn execute(&self, id: Uuid, email: &str) -> anyhow::Result<Option<OrderDetail>> {
        self.repo.lookup(id, email.trim()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::application::use_cases::orders::testing::MemOrders;
    use crate::application::use_cases::orders::create_order::{
        CreateOrder, CreateOrderInput, CreateOrderItemInput,
    };
    use crate::application::use_cases::products::testing::dec;
    use crate::domain::stock::ledger::StockTransactionType;

    use super::*;

    #[tokio::test]
    async fn requires_the_matching_customer_email() {
        let repo = MemOrders::default();
        let product = repo.products.seed("TEE-01", dec("20.00"), true);
        repo.ledger.track(product.id);
        repo.ledger
            .append(product.id, 5, StockTransactionType::Incoming, None, None);

        let placed = CreateOrder { repo: &repo }
            .execute(CreateOrderInput {
                customer_name: None,
                customer_email: "ada@example.com".into(),
                items: vec![CreateOrderItemInput {
                    product_id: product.id,
                    quantity: 1,
                }],
            })
            .await
            .unwrap();

        let uc = LookupOrder { repo: &repo };
        let found = uc
            .execute(placed.order.id, " ada@example.com ")
            .await
            .unwrap();
        assert!(found.is_some());

        let denied = uc
            .execute(placed.order.id, "mallory@example.com")
            .await
            .unwrap();
        assert!(denied.is_none());
    }
}
