use uuid::Uuid;

use crate::application::ports::order_repository::OrderRepository;
use crate::domain::orders::order::{OrderDetail, OrderStatus};

/// Moves an order to a new status. A transition into CANCELLED restores the
/// reserved stock through the repository's compensating path; any other
/// transition is a plain status write. Transitions are not otherwise
/// restricted, back office staff may move an order freely.
pub struct UpdateOrderStatus<'a, R: OrderRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: OrderRepository + ?Sized> UpdateOrderStatus<'a, R> {
    pub async fn execute(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> anyhow::Result<Option<OrderDetail>> {
        let Some(current) = self.repo.get(id).await? else {
            return Ok(None);
        };
        if status == OrderStatus::Cancelled {
            // Already-cancelled orders keep their single restore.
            if current.order.status != OrderStatus::Cancelled
                && self.repo.cancel(id).await?.is_none()
            {
                return Ok(None);
            }
        } else if self.repo.set_status(id, status).await?.is_none() {
            return Ok(None);
        }
        self.repo.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::application::use_cases::orders::create_order::{
        CreateOrder, CreateOrderInput, CreateOrderItemInput,
    };
    use crate::application::use_cases::orders::testing::{MemOrders, RESTOCK_NOTE};
    use crate::application::use_cases::products::testing::dec;
    use crate::domain::stock::ledger::StockTransactionType;

    use super::*;

    async fn place_order(repo: &MemOrders, stock: i32, quantity: i32) -> (Uuid, Uuid) {
        let product = repo.products.seed("TEE-01", dec("20.00"), true);
        repo.ledger.track(product.id);
        repo.ledger
            .append(product.id, stock, StockTransactionType::Incoming, None, None);
        let detail = CreateOrder { repo }
            .execute(CreateOrderInput {
                customer_name: None,
                customer_email: "ada@example.com".into(),
                items: vec![CreateOrderItemInput {
                    product_id: product.id,
                    quantity,
                }],
            })
            .await
            .unwrap();
        (detail.order.id, product.id)
    }

    #[tokio::test]
    async fn plain_transitions_do_not_touch_the_ledger() {
        let repo = MemOrders::default();
        let (order_id, product_id) = place_order(&repo, 10, 4).await;
        let rows_before = repo.ledger.rows_for(product_id).len();

        let uc = UpdateOrderStatus { repo: &repo };
        let updated = uc
            .execute(order_id, OrderStatus::Confirmed)
            .await
            .unwrap()
            .expect("found");

        assert_eq!(updated.order.status, OrderStatus::Confirmed);
        assert_eq!(repo.ledger.rows_for(product_id).len(), rows_before);
        assert_eq!(repo.ledger.sum_for(product_id), 6);
    }

    #[tokio::test]
    async fn cancelling_restores_exactly_what_was_reserved() {
        let repo = MemOrders::default();
        let (order_id, product_id) = place_order(&repo, 10, 4).await;
        assert_eq!(repo.ledger.sum_for(product_id), 6);

        let uc = UpdateOrderStatus { repo: &repo };
        let cancelled = uc
            .execute(order_id, OrderStatus::Cancelled)
            .await
            .unwrap()
            .expect("found");

        assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
        assert_eq!(repo.ledger.sum_for(product_id), 10);

        let rows = repo.ledger.rows_for(product_id);
        let restore = rows.last().unwrap();
        assert_eq!(restore.quantity, 4);
        assert_eq!(restore.tx_type, StockTransactionType::Adjustment);
        assert_eq!(restore.reference_id, Some(order_id));
        assert_eq!(restore.notes.as_deref(), Some(RESTOCK_NOTE));

        // Reservation rows stay in the ledger; the restore compensates them.
        assert!(rows.iter().any(|t| {
            t.quantity == -4 && t.tx_type == StockTransactionType::OutgoingOrder
        }));
    }

    #[tokio::test]
    async fn a_second_cancellation_does_not_restore_again() {
        let repo = MemOrders::default();
        let (order_id, product_id) = place_order(&repo, 10, 4).await;

        let uc = UpdateOrderStatus { repo: &repo };
        uc.execute(order_id, OrderStatus::Cancelled).await.unwrap();
        let rows_after_first = repo.ledger.rows_for(product_id).len();

        let second = uc
            .execute(order_id, OrderStatus::Cancelled)
            .await
            .unwrap()
            .expect("found");
        assert_eq!(second.order.status, OrderStatus::Cancelled);
        assert_eq!(repo.ledger.rows_for(product_id).len(), rows_after_first);
        assert_eq!(repo.ledger.sum_for(product_id), 10);
    }

    #[tokio::test]
    async fn unknown_orders_come_back_as_none() {
        let repo = MemOrders::default();
        let uc = UpdateOrderStatus { repo: &repo };
        let got = uc
            .execute(Uuid::new_v4(), OrderStatus::Fulfilled)
            .await
            .unwrap();
        assert!(got.is_none());
    }
}
