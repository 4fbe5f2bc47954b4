pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod session;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Health check endpoint for liveness probes.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "invoice-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Prometheus metrics endpoint.
pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        crate::services::metrics::get_metrics(),
    )
}
