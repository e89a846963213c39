use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::products::create_product::{
    CreateProduct, CreateProductError, CreateProductInput,
};
use crate::application::use_cases::products::delete_product::DeleteProduct;
use crate::application::use_cases::products::get_product::GetProduct;
use crate::application::use_cases::products::list_products::ListProducts;
use crate::application::use_cases::products::update_product::{
    UpdateProduct, UpdateProductError, UpdateProductInput,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::catalog::product::Product;

use super::auth::{SessionToken, require_user};
use super::error::{self, ApiError};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub sku: String,
    pub display_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub is_on_sale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            sku: p.sku,
            display_name: p.display_name,
            description: p.description,
            price: p.price,
            is_on_sale: p.is_on_sale,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub sku: String,
    pub display_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub is_on_sale: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub sku: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub is_on_sale: Option<bool>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/products", tag = "Products", responses(
    (status = 200, body = [ProductResponse]),
    (status = 401, description = "No live session")
))]
pub async fn list_products(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    require_user(&ctx, &token?).await?;
    let repo = ctx.product_repo();
    let uc = ListProducts {
        repo: repo.as_ref(),
    };
    let products = uc.execute().await.map_err(error::internal)?;
    Ok(Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}

#[utoipa::path(post, path = "/api/products", tag = "Products", request_body = CreateProductRequest, responses(
    (status = 200, body = ProductResponse),
    (status = 400, description = "Validation failed"),
    (status = 401, description = "No live session")
))]
pub async fn create_product(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    require_user(&ctx, &token?).await?;
    let repo = ctx.product_repo();
    let uc = CreateProduct {
        repo: repo.as_ref(),
    };
    let input = CreateProductInput {
        sku: req.sku,
        display_name: req.display_name,
        description: req.description,
        price: req.price,
        is_on_sale: req.is_on_sale,
    };
    let product = uc.execute(input).await.map_err(|e| match e {
        CreateProductError::Invalid(v) => error::bad_request(&v.to_string()),
        CreateProductError::Repo(err) => error::internal(err),
    })?;
    Ok(Json(product.into()))
}

#[utoipa::path(get, path = "/api/products/{id}", tag = "Products", params(
    ("id" = Uuid, Path, description = "Product id")
), responses(
    (status = 200, body = ProductResponse),
    (status = 401, description = "No live session"),
    (status = 404, description = "Unknown or deleted product")
))]
pub async fn get_product(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    require_user(&ctx, &token?).await?;
    let repo = ctx.product_repo();
    let uc = GetProduct {
        repo: repo.as_ref(),
    };
    let product = uc
        .execute(id)
        .await
        .map_err(error::internal)?
        .ok_or_else(|| error::not_found("Product not found"))?;
    Ok(Json(product.into()))
}

#[utoipa::path(patch, path = "/api/products/{id}", tag = "Products", request_body = UpdateProductRequest, params(
    ("id" = Uuid, Path, description = "Product id")
), responses(
    (status = 200, body = ProductResponse),
    (status = 400, description = "Validation failed"),
    (status = 401, description = "No live session"),
    (status = 404, description = "Unknown or deleted product")
))]
pub async fn update_product(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    require_user(&ctx, &token?).await?;
    let repo = ctx.product_repo();
    let uc = UpdateProduct {
        repo: repo.as_ref(),
    };
    let input = UpdateProductInput {
        sku: req.sku,
        display_name: req.display_name,
        description: req.description,
        price: req.price,
        is_on_sale: req.is_on_sale,
    };
    let updated = uc.execute(id, input).await.map_err(|e| match e {
        UpdateProductError::Invalid(v) => error::bad_request(&v.to_string()),
        UpdateProductError::Repo(err) => error::internal(err),
    })?;
    let product = updated.ok_or_else(|| error::not_found("Product not found"))?;
    Ok(Json(product.into()))
}

#[utoipa::path(delete, path = "/api/products/{id}", tag = "Products", params(
    ("id" = Uuid, Path, description = "Product id")
), responses(
    (status = 204, description = "Product removed from the catalog"),
    (status = 401, description = "No live session"),
    (status = 404, description = "Unknown or deleted product")
))]
pub async fn delete_product(
    State(ctx): State<AppContext>,
    token: Result<SessionToken, ApiError>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_user(&ctx, &token?).await?;
    let repo = ctx.product_repo();
    let uc = DeleteProduct {
        repo: repo.as_ref(),
    };
    if uc.execute(id).await.map_err(error::internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(error::not_found("Product not found"))
    }
}
