//! Account registry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use karat_db::AccountRepository;
use karat_shared::types::Paginated;

use crate::AppState;
use crate::middleware::CallerIdentity;

use super::{error_response, page_request};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts", get(list_accounts))
        .route("/accounts/{id}", get(get_account))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name, e.g. "Shop Cash".
    pub name: String,
    /// Balance the account opens with.
    #[serde(default)]
    pub opening_balance: Decimal,
}

/// Query parameters for paginated lists.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Json(body): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());
    match repo.create(&body.name, body.opening_balance).await {
        Ok(account) => (StatusCode::CREATED, Json(json!({ "account": account }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/accounts` - List accounts in the paginated envelope.
async fn list_accounts(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let page = page_request(query.page, query.page_size);
    let repo = AccountRepository::new((*state.db).clone());
    match repo.list(&page).await {
        Ok((items, total)) => {
            (StatusCode::OK, Json(Paginated::new(items, &page, total))).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// GET `/accounts/{id}` - Get an account with its materialized balance.
async fn get_account(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "account": account }))).into_response(),
        Err(err) => error_response(err),
    }
}
