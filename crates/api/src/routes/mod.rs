//! API route definitions.

use axum::http::StatusCode;
use axum::{Json, Router, middleware, response::IntoResponse, response::Response};
use serde_json::json;

use karat_db::repositories::StoreError;
use karat_shared::AppError;

use crate::{AppState, middleware::identity_middleware};

pub mod accounts;
pub mod health;
pub mod inventory;
pub mod invoices;
pub mod job_cards;
pub mod parties;
pub mod purchases;

/// Creates the API router: health is public, everything else requires a
/// resolved caller identity.
pub fn api_routes() -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(invoices::routes())
        .merge(purchases::routes())
        .merge(inventory::routes())
        .merge(parties::routes())
        .merge(accounts::routes())
        .merge(job_cards::routes())
        .layer(middleware::from_fn(identity_middleware));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Builds a bounded page request from raw query parameters.
pub(crate) fn page_request(
    page: Option<u64>,
    page_size: Option<u64>,
) -> karat_shared::types::PageRequest {
    let defaults = karat_shared::types::PageRequest::default();
    karat_shared::types::PageRequest {
        page: page.unwrap_or(defaults.page).max(1),
        page_size: page_size.unwrap_or(defaults.page_size).clamp(1, 100),
    }
}

/// Converts a repository error into the uniform error response.
pub(crate) fn error_response(err: StoreError) -> Response {
    let app_error: AppError = err.into();
    let status = StatusCode::from_u16(app_error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": app_error.error_code(),
            "message": app_error.to_string(),
        })),
    )
        .into_response()
}
