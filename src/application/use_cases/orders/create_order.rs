use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::order_repository::{
    NewOrder, NewOrderItem, OrderCreateError, OrderRepository,
};
use crate::application::validate;
use crate::domain::orders::order::OrderDetail;
use crate::domain::stock::ledger::StockShortage;

/// Places a customer order and reserves its stock. The repository performs
/// the check-and-insert atomically; this use case owns input validation.
pub struct CreateOrder<'a, R: OrderRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub customer_name: Option<String>,
    pub customer_email: String,
    pub items: Vec<CreateOrderItemInput>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Error)]
pub enum CreateOrderError {
    #[error("order must contain at least one item")]
    EmptyItems,
    #[error("customer_email is not a valid email address")]
    InvalidEmail,
    #[error("item quantities must be at least 1")]
    NonPositiveQuantity,
    #[error("products not found")]
    ProductsNotFound(Vec<Uuid>),
    #[error("insufficient stock for one or more items")]
    InsufficientStock(Vec<StockShortage>),
    #[error(transparent)]
    Repo(#[from] anyhow::Error),
}

impl<'a, R: OrderRepository + ?Sized> CreateOrder<'a, R> {
    pub async fn execute(&self, input: CreateOrderInput) -> Result<OrderDetail, CreateOrderError> {
        let email = input.customer_email.trim();
        if !validate::is_valid_email(email) {
            return Err(CreateOrderError::InvalidEmail);
        }
        if input.items.is_empty() {
            return Err(CreateOrderError::EmptyItems);
        }
        if input.items.iter().any(|item| item.quantity < 1) {
            return Err(CreateOrderError::NonPositiveQuantity);
        }

        let new_order = NewOrder {
            customer_name: validate::trimmed_or_none(input.customer_name.as_deref()),
            customer_email: email.to_string(),
            items: input
                .items
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        };
        match self.repo.create(&new_order).await {
            Ok(detail) => Ok(detail),
            Err(OrderCreateError::ProductsNotFound(ids)) => {
                Err(CreateOrderError::ProductsNotFound(ids))
            }
            Err(OrderCreateError::InsufficientStock(items)) => {
                Err(CreateOrderError::InsufficientStock(items))
            }
            Err(OrderCreateError::Db(e)) => Err(CreateOrderError::Repo(e)),
        }
    }
}
