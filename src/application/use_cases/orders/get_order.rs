use uuid::Uuid;

use crate::application::ports::order_repository::OrderRepository;
use crate::domain::orders::order::OrderDetail;

pub struct GetOrder<'a, R: OrderRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: OrderRepository + ?Sized> GetOrder<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<OrderDetail>> {
        self.repo.get(id).await
    }
}
