//! Router builder utilities for order routes

use crate::server::handlers::{AppState, list_orders, upload_orders};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

/// Build the order routes
///
/// - POST /orders/upload - Ingest a fixed-width order file (multipart `file` field)
/// - GET /orders/list - List stored orders, filtered by `orderId`, `startDate`, `endDate`
pub fn build_order_routes(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/orders/upload", post(upload_orders))
        .route("/orders/list", get(list_orders))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "order-ingest"
    }))
}
