//! Health check routes.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use crate::AppState;

/// Creates the health routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET `/health` - Liveness check.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "up" })))
}
