use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::orders::create_order::{
    CreateOrder, CreateOrderError, CreateOrderInput, CreateOrderItemInput,
};
use crate::application::use_cases::orders::get_order::GetOrder;
use crate::application::use_cases::orders::list_orders::ListOrders;
use crate::application::use_cases::orders::lookup_order::LookupOrder;
use crate::application::use_cases::orders::update_order_status::UpdateOrderStatus;
use crate::bootstrap::app_context::AppContext;
use crate::domain::orders::order::{OrderDetail, OrderLine, OrderStatus};

use super::auth::{SessionToken, require_user};
use super::error::{self, ApiError};
use super::products::ProductResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_email: String,
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// One of PENDING, CONFIRMED, CANCELLED, FULFILLED.
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_name: Option<String>,
    pub customer_email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product: ProductResponse,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderLine> for OrderItemResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            id: line.id,
            product: line.product.into(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            created_at: line.created_at,
        }
    }
}

impl From<OrderDetail> for OrderResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            id: detail.order.id,
            customer_name: detail.order.customer_name,
            customer_email: detail.order.customer_email,
            status: detail.order.status.as_str().to_string(),
            created_at: detail.order.created_at,
            updated_at: detail.order.updated_at,
            items: detail
                .items
                .into_iter()
                .map(OrderItemResponse::from)
                .collect(),
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/lookup/:id", get(lookup_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", patch(update_order_status))
        .with_state(ctx)
}

/// Public checkout endpoint. All stock checks and reservations happen in
/// one transaction, so two rival orders cannot both claim the last unit.
#[utoipa::path(post, path = "/api/orders", tag = "Orders", security(()), request_body = CreateOrderRequest, responses(
    (status = 200, body = OrderResponse),
    (status = 400, description = "Invalid input or insufficient stock"),
    (status = 404, description = "One or more products do not exist")
))]
pub async fn create_order(
    State(ctx): State<AppContext>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let repo = ctx.order_repo();
    let uc = CreateOrder {
        repo: repo.as_ref(),
    };
    let input = CreateOrderInput {
        customer_name: req.customer_name,
        customer_email: req.customer_email,
        items: req
            .items
            .into_iter()
            .map(|item| CreateOrderItemInput {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect(),
    };
    let detail = uc.execute(input).await.map_err(|e| match e {
        CreateOrderError::EmptyItems
        | CreateOrderError::InvalidEmail
        | CreateOrderError::NonPositiveQuantity => error::bad_request(&e.to_string()),
        CreateOrderError::ProductsNotFound(missing) => error::products_not_found(&missing),
        CreateOrderError::InsufficientStock(shortages) => error::insufficient_stock(&shortages),
        CreateOrderError::Repo(err) => error::internal(err),
    })?;
    Ok(Json(detail.into()))
}

#[utoipa::path(get, path = "/api/orders", tag = "Orders", responses(
    (status = 200, body = [OrderResponse]),
    (status = 401, description = "No live session")
))]
pub async fn list_orders(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    require_user(&ctx, &token?).await?;
    let repo = ctx.order_repo();
    let uc = ListOrders {
        repo: repo.as_ref(),
    };
    let orders = uc.execute().await.map_err(error::internal)?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// Customers track their order with the id from the confirmation mail plus
/// the email it was placed under. A wrong email yields the same 404 as an
/// unknown id.
#[utoipa::path(get, path = "/api/orders/lookup/{id}", tag = "Orders", security(()), params(
    ("id" = Uuid, Path, description = "Order id"),
    ("email" = String, Query, description = "Email the order was placed under")
), responses(
    (status = 200, body = OrderResponse),
    (status = 400, description = "Missing email parameter"),
    (status = 404, description = "No order under this id and email")
))]
pub async fn lookup_order(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<OrderResponse>, ApiError> {
    let email = query
        .email
        .ok_or_else(|| error::bad_request("email query parameter is required"))?;
    let repo = ctx.order_repo();
    let uc = LookupOrder {
        repo: repo.as_ref(),
    };
    let detail = uc
        .execute(id, &email)
        .await
        .map_err(error::internal)?
        .ok_or_else(|| error::not_found("Order not found"))?;
    Ok(Json(detail.into()))
}

#[utoipa::path(get, path = "/api/orders/{id}", tag = "Orders", params(
    ("id" = Uuid, Path, description = "Order id")
), responses(
    (status = 200, body = OrderResponse),
    (status = 401, description = "No live session"),
    (status = 404, description = "Unknown order")
))]
pub async fn get_order(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    require_user(&ctx, &token?).await?;
    let repo = ctx.order_repo();
    let uc = GetOrder {
        repo: repo.as_ref(),
    };
    let detail = uc
        .execute(id)
        .await
        .map_err(error::internal)?
        .ok_or_else(|| error::not_found("Order not found"))?;
    Ok(Json(detail.into()))
}

#[utoipa::path(patch, path = "/api/orders/{id}/status", tag = "Orders", request_body = UpdateOrderStatusRequest, params(
    ("id" = Uuid, Path, description = "Order id")
), responses(
    (status = 200, body = OrderResponse),
    (status = 400, description = "Unknown status value"),
    (status = 401, description = "No live session"),
    (status = 404, description = "Unknown order")
))]
pub async fn update_order_status(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    require_user(&ctx, &token?).await?;
    let status = OrderStatus::parse(req.status.trim()).ok_or_else(|| {
        error::bad_request("status must be one of PENDING, CONFIRMED, CANCELLED, FULFILLED")
    })?;
    let repo = ctx.order_repo();
    let uc = UpdateOrderStatus {
        repo: repo.as_ref(),
    };
    let detail = uc
        .execute(id, status)
        .await
        .map_err(error::internal)?
        .ok_or_else(|| error::not_found("Order not found"))?;
    Ok(Json(detail.into()))
}
