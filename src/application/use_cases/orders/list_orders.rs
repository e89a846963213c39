use crate::application::ports::order_repository::OrderRepository;
use crate::domain::orders::order::OrderDetail;

pub struct ListOrders<'a, R: OrderRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: OrderRepository + ?Sized> ListOrders<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<OrderDetail>> {
        self.repo.list().await
    }
}
