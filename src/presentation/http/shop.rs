use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::application::use_cases::shop::get_sale_product::GetSaleProduct;
use crate::application::use_cases::shop::list_sale_products::ListSaleProducts;
use crate::bootstrap::app_context::AppContext;

use super::error::{self, ApiError};
use super::products::ProductResponse;

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/shop/products", get(list_sale_products))
        .route("/shop/products/:id", get(get_sale_product))
        .with_state(ctx)
}

/// Public storefront listing. Only live products flagged on sale show up.
#[utoipa::path(get, path = "/api/shop/products", tag = "Shop", security(()), responses(
    (status = 200, body = [ProductResponse])
))]
pub async fn list_sale_products(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let repo = ctx.product_repo();
    let uc = ListSaleProducts {
        repo: repo.as_ref(),
    };
    let products = uc.execute().await.map_err(error::internal)?;
    Ok(Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}

/// A product that exists but is off sale looks identical to one that never existed.
#[utoipa::path(get, path = "/api/shop/products/{id}", tag = "Shop", security(()), params(
    ("id" = Uuid, Path, description = "Product id")
), responses(
    (status = 200, body = ProductResponse),
    (status = 404, description = "Product is unknown, deleted or not on sale")
))]
pub async fn get_sale_product(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let repo = ctx.product_repo();
    let uc = GetSaleProduct {
        repo: repo.as_ref(),
    };
    let product = uc
        .execute(id)
        .await
        .map_err(error::internal)?
        .ok_or_else(|| error::not_found("Product not found"))?;
    Ok(Json(product.into()))
}
