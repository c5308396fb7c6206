//! Inventory routes: categories and the stock movement ledger.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use karat_db::InventoryRepository;
use karat_shared::types::Paginated;

use crate::AppState;
use crate::middleware::CallerIdentity;

use super::{error_response, page_request};

/// Creates the inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory/categories", post(create_category))
        .route("/inventory/categories", get(list_categories))
        .route("/inventory/categories/{id}", get(get_category))
        .route("/inventory/movements", get(list_movements))
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Display name; unique case- and whitespace-insensitively.
    pub name: String,
}

/// Query parameters for paginated lists.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// Query parameters for listing movements.
#[derive(Debug, Deserialize)]
pub struct ListMovementsQuery {
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// POST `/inventory/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Json(body): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    let repo = InventoryRepository::new((*state.db).clone());
    match repo.create_category(&body.name).await {
        Ok(category) => (StatusCode::CREATED, Json(json!({ "category": category }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/inventory/categories` - List categories in the paginated
/// envelope.
async fn list_categories(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let page = page_request(query.page, query.page_size);
    let repo = InventoryRepository::new((*state.db).clone());
    match repo.list_categories(&page).await {
        Ok((items, total)) => {
            (StatusCode::OK, Json(Paginated::new(items, &page, total))).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// GET `/inventory/categories/{id}` - Get a category with its
/// materialized totals.
async fn get_category(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InventoryRepository::new((*state.db).clone());
    match repo.get_category(id).await {
        Ok(category) => (StatusCode::OK, Json(json!({ "category": category }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/inventory/movements` - List stock movements in the paginated
/// envelope.
async fn list_movements(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListMovementsQuery>,
) -> impl IntoResponse {
    let page = page_request(query.page, query.page_size);
    let repo = InventoryRepository::new((*state.db).clone());
    match repo.list_movements(query.category_id, &page).await {
        Ok((items, total)) => {
            (StatusCode::OK, Json(Paginated::new(items, &page, total))).into_response()
        }
        Err(err) => error_response(err),
    }
}
