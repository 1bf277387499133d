//! System endpoints: health check and Prometheus exposition.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::{CatalogError, ErrorResponse};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /metrics`: Prometheus text exposition of the request counters and
/// pool gauges.
///
/// # Errors
///
/// Returns [`CatalogError::Internal`] if the registry cannot be encoded.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "System",
    summary = "Prometheus metrics",
    responses(
        (status = 200, description = "Text exposition format", content_type = "text/plain"),
        (status = 500, description = "Encoding failure", body = ErrorResponse),
    )
)]
pub async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CatalogError> {
    let body = state.metrics.encode_text()?;
    Ok(([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
}
