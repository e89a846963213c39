use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::stock::add_incoming::{
    AddIncomingError, AddIncomingInput, AddIncomingStock,
};
use crate::application::use_cases::stock::adjust_stock::{
    AdjustStock, AdjustStockError, AdjustStockInput,
};
use crate::application::use_cases::stock::get_stock_level::GetStockLevel;
use crate::application::use_cases::stock::list_transactions::ListStockTransactions;
use crate::bootstrap::app_context::AppContext;
use crate::domain::stock::ledger::StockTransaction;

use super::auth::{SessionToken, require_user};
use super::error::{self, ApiError};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddStockRequest {
    pub product_id: Uuid,
    /// Units received, at least 1.
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustStockRequest {
    pub product_id: Uuid,
    /// Signed correction, must not be zero. Negative values may not take
    /// stock below zero.
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockLevelResponse {
    pub product_id: Uuid,
    pub stock: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockTransactionResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub reference_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StockTransaction> for StockTransactionResponse {
    fn from(tx: StockTransaction) -> Self {
        Self {
            id: tx.id,
            product_id: tx.product_id,
            quantity: tx.quantity,
            tx_type: tx.tx_type.as_str().to_string(),
            reference_id: tx.reference_id,
            notes: tx.notes,
            created_at: tx.created_at,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/stock/incoming", post(add_incoming_stock))
        .route("/stock/adjust", post(adjust_stock))
        .route("/stock/:product_id", get(get_stock_level))
        .route("/stock/:product_id/transactions", get(list_transactions))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/stock/incoming", tag = "Stock", request_body = AddStockRequest, responses(
    (status = 200, body = StockTransactionResponse),
    (status = 400, description = "Quantity below 1"),
    (status = 401, description = "No live session"),
    (status = 404, description = "Unknown or deleted product")
))]
pub async fn add_incoming_stock(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Json(req): Json<AddStockRequest>,
) -> Result<Json<StockTransactionResponse>, ApiError> {
    require_user(&ctx, &token?).await?;
    let products = ctx.product_repo();
    let stock = ctx.stock_repo();
    let uc = AddIncomingStock {
        products: products.as_ref(),
        stock: stock.as_ref(),
    };
    let input = AddIncomingInput {
        product_id: req.product_id,
        quantity: req.quantity,
        notes: req.notes,
    };
    let tx = uc.execute(input).await.map_err(|e| match e {
        AddIncomingError::InvalidQuantity => error::bad_request(&e.to_string()),
        AddIncomingError::ProductNotFound => error::not_found("Product not found"),
        AddIncomingError::Repo(err) => error::internal(err),
    })?;
    Ok(Json(tx.into()))
}

#[utoipa::path(post, path = "/api/stock/adjust", tag = "Stock", request_body = AdjustStockRequest, responses(
    (status = 200, body = StockTransactionResponse),
    (status = 400, description = "Zero quantity or insufficient stock"),
    (status = 401, description = "No live session"),
    (status = 404, description = "Unknown or deleted product")
))]
pub async fn adjust_stock(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<StockTransactionResponse>, ApiError> {
    require_user(&ctx, &token?).await?;
    let products = ctx.product_repo();
    let stock = ctx.stock_repo();
    let uc = AdjustStock {
        products: products.as_ref(),
        stock: stock.as_ref(),
    };
    let input = AdjustStockInput {
        product_id: req.product_id,
        quantity: req.quantity,
        notes: req.notes,
    };
    let tx = uc.execute(input).await.map_err(|e| match e {
        AdjustStockError::ZeroQuantity => error::bad_request(&e.to_string()),
        AdjustStockError::ProductNotFound => error::not_found("Product not found"),
        AdjustStockError::Insufficient {
            available,
            requested,
        } => error::insufficient_stock_single(available, requested),
        AdjustStockError::Repo(err) => error::internal(err),
    })?;
    Ok(Json(tx.into()))
}

#[utoipa::path(get, path = "/api/stock/{product_id}", tag = "Stock", params(
    ("product_id" = Uuid, Path, description = "Product id")
), responses(
    (status = 200, body = StockLevelResponse),
    (status = 401, description = "No live session"),
    (status = 404, description = "Unknown or deleted product")
))]
pub async fn get_stock_level(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<StockLevelResponse>, ApiError> {
    require_user(&ctx, &token?).await?;
    let products = ctx.product_repo();
    let stock = ctx.stock_repo();
    let uc = GetStockLevel {
        products: products.as_ref(),
        stock: stock.as_ref(),
    };
    let level = uc
        .execute(product_id)
        .await
        .map_err(error::internal)?
        .ok_or_else(|| error::not_found("Product not found"))?;
    Ok(Json(StockLevelResponse {
        product_id,
        stock: level,
    }))
}

#[utoipa::path(get, path = "/api/stock/{product_id}/transactions", tag = "Stock", params(
    ("product_id" = Uuid, Path, description = "Product id")
), responses(
    (status = 200, body = [StockTransactionResponse]),
    (status = 401, description = "No live session"),
    (status = 404, description = "Unknown or deleted product")
))]
pub async fn list_transactions(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Vec<StockTransactionResponse>>, ApiError> {
    require_user(&ctx, &token?).await?;
    let products = ctx.product_repo();
    let stock = ctx.stock_repo();
    let uc = ListStockTransactions {
        products: products.as_ref(),
        stock: stock.as_ref(),
    };
    let rows = uc
        .execute(product_id)
        .await
        .map_err(error::internal)?
        .ok_or_else(|| error::not_found("Product not found"))?;
    Ok(Json(
        rows.into_iter().map(StockTransactionResponse::from).collect(),
    ))
}
