//! HTTP handlers for order upload and listing
//!
//! Handlers only adapt HTTP to the [`IngestCoordinator`]: they decode the
//! upload into lines, pick a status code from the outcome, and shape the
//! JSON body. All decoding and storage rules live in the core.

use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::core::error::{RequestError, ServiceError};
use crate::core::order::Order;
use crate::core::query::OrderFilter;
use crate::core::service::IngestCoordinator;

/// Name of the multipart field carrying the order file
pub const UPLOAD_FIELD: &str = "file";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: IngestCoordinator,
}

/// Body returned when every uploaded line was accepted
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSuccessResponse {
    pub status_code: u16,
    pub message: String,
    pub data: Vec<Order>,
}

/// Body returned when at least one uploaded line was rejected
///
/// The accepted orders have still been stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFailureResponse {
    pub status_code: u16,
    pub message: String,
    pub successful_orders: Vec<Order>,
    pub errors: Vec<String>,
}

/// Body returned by a listing that matched something
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    pub status_code: u16,
    pub message: String,
    pub data: Vec<Order>,
}

/// Split an uploaded text into its non-blank lines
pub fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

async fn read_upload(multipart: &mut Multipart) -> Result<String, ServiceError> {
    let invalid = |e: axum::extract::multipart::MultipartError| RequestError::InvalidUpload {
        message: e.body_text(),
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await.map_err(invalid)?;
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }
    }

    Err(RequestError::MissingFile.into())
}

/// POST /orders/upload
///
/// Multipart form with the fixed-width order file in the `file` field.
/// Returns 200 when every line was accepted, 400 with both the stored
/// orders and the per-line errors otherwise.
pub async fn upload_orders(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ServiceError> {
    let content = read_upload(&mut multipart).await?;
    let lines = non_blank_lines(&content);

    tracing::info!(lines = lines.len(), "order file received");

    let result = state.coordinator.ingest(lines).await?;

    if result.has_errors() {
        let body = UploadFailureResponse {
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            message: "Error processing file".to_string(),
            errors: result.errors.iter().map(ToString::to_string).collect(),
            successful_orders: result.accepted,
        };
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let body = UploadSuccessResponse {
        status_code: StatusCode::OK.as_u16(),
        message: "File processed successfully".to_string(),
        data: result.accepted,
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// GET /orders/list?orderId=&startDate=&endDate=
///
/// Responds 404 when no stored order matches.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<OrdersResponse>, ServiceError> {
    let filter = filter.normalized();
    let orders = state.coordinator.query(&filter).await?;

    if orders.is_empty() {
        return Err(ServiceError::NotFound {
            message: "No orders found".to_string(),
        });
    }

    Ok(Json(OrdersResponse {
        status_code: StatusCode::OK.as_u16(),
        message: "Orders found".to_string(),
        data: orders,
    }))
}
