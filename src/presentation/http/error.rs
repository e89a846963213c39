use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::stock::ledger::StockShortage;

/// Error responses carry a machine-readable `error` code next to the
/// human-readable `message`, with extra fields per code where callers need
/// them (shortage lists, missing ids).
pub type ApiError = (StatusCode, Json<Value>);

pub fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": message, "error": "BAD_REQUEST" })),
    )
}

pub fn not_found(message: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": message, "error": "NOT_FOUND" })),
    )
}

pub fn unauthorized() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized", "error": "UNAUTHORIZED" })),
    )
}

pub fn internal(err: anyhow::Error) -> ApiError {
    tracing::error!(error = ?err, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "internal server error", "error": "INTERNAL" })),
    )
}

pub fn products_not_found(missing: &[Uuid]) -> ApiError {
    let ids = missing
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": format!("Products not found: {ids}"),
            "error": "PRODUCTS_NOT_FOUND",
            "missing": missing,
        })),
    )
}

pub fn insufficient_stock(shortages: &[StockShortage]) -> ApiError {
    let items: Vec<Value> = shortages
        .iter()
        .map(|s| {
            json!({
                "product_id": s.product_id,
                "available": s.available,
                "requested": s.requested,
            })
        })
        .collect();
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "message": "Insufficient stock for one or more items",
            "error": "INSUFFICIENT_STOCK",
            "items": items,
        })),
    )
}

pub fn insufficient_stock_single(available: i64, requested: i64) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "message": format!("Insufficient stock. Available: {available}, requested: {requested}"),
            "error": "INSUFFICIENT_STOCK",
            "available": available,
            "requested": requested,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortage_payload_lists_every_item() {
        let shortages = vec![
            StockShortage {
                product_id: Uuid::new_v4(),
                available: 1,
                requested: 3,
            },
            StockShortage {
                product_id: Uuid::new_v4(),
                available: 0,
                requested: 2,
            },
        ];
        let (status, Json(body)) = insufficient_stock(&shortages);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INSUFFICIENT_STOCK");
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][0]["available"], 1);
        assert_eq!(body["items"][0]["requested"], 3);
    }

    #[test]
    fn missing_products_are_named_in_the_message() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let (status, Json(body)) = products_not_found(&[a, b]);
        assert_eq!(status, StatusCode::NOT_FOUND);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains(&a.to_string()));
        assert!(message.contains(&b.to_string()));
        assert_eq!(body["missing"].as_array().unwrap().len(), 2);
    }
}
