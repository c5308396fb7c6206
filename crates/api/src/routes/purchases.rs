//! Purchase routes: drafts and finalization.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use karat_core::document::DocumentStatus;
use karat_db::repositories::purchases::{
    CreatePurchaseInput, PurchaseItemInput, UpdatePurchaseInput,
};
use karat_db::{FinalizeRepository, PurchaseRepository};
use karat_shared::types::Paginated;

use crate::AppState;
use crate::middleware::CallerIdentity;

use super::{error_response, page_request};

/// Creates the purchase routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", post(create_purchase))
        .route("/purchases", get(list_purchases))
        .route("/purchases/{id}", get(get_purchase))
        .route("/purchases/{id}", patch(update_purchase))
        .route("/purchases/{id}", delete(delete_purchase))
        .route("/purchases/{id}/finalize", post(finalize_purchase))
}

/// Request body for one purchase line.
#[derive(Debug, Deserialize)]
pub struct PurchaseItemRequest {
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Catalog category name.
    pub category_name: Option<String>,
    /// Piece count.
    pub qty: Decimal,
    /// Weight in grams.
    pub weight_grams: Decimal,
    /// Purity the vendor claims, per-mille.
    pub entered_purity: u16,
}

impl From<PurchaseItemRequest> for PurchaseItemInput {
    fn from(item: PurchaseItemRequest) -> Self {
        Self {
            description: item.description,
            category_name: item.category_name,
            qty: item.qty,
            weight_grams: item.weight_grams,
            entered_purity: item.entered_purity,
        }
    }
}

/// Request body for creating a draft purchase.
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    /// The vendor.
    pub vendor_id: Uuid,
    /// Document date.
    pub purchase_date: NaiveDate,
    /// Line items.
    pub items: Vec<PurchaseItemRequest>,
    /// Agreed total.
    pub total_amount: Decimal,
    /// Money paid up front.
    #[serde(default)]
    pub paid_amount: Decimal,
    /// Account the paid portion was drawn from.
    pub paid_from_account_id: Option<Uuid>,
    /// Advance gold handed to the vendor, grams.
    pub advance_gold_weight: Option<Decimal>,
    /// Purity of the advance gold, per-mille.
    pub advance_gold_purity: Option<u16>,
    /// Gold received from the vendor in exchange, grams.
    pub exchange_gold_weight: Option<Decimal>,
    /// Purity of the exchanged gold, per-mille.
    pub exchange_gold_purity: Option<u16>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Request body for editing a purchase.
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseRequest {
    /// New document date.
    pub purchase_date: Option<NaiveDate>,
    /// Replacement line items.
    pub items: Option<Vec<PurchaseItemRequest>>,
    /// New agreed total.
    pub total_amount: Option<Decimal>,
    /// New paid amount.
    pub paid_amount: Option<Decimal>,
    /// New paying account.
    pub paid_from_account_id: Option<Uuid>,
    /// New notes.
    pub notes: Option<String>,
    /// Override justification, required on locked documents.
    pub reason: Option<String>,
}

/// Query parameters for listing purchases.
#[derive(Debug, Deserialize)]
pub struct ListPurchasesQuery {
    /// Filter by status (`draft` or `finalized`).
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// Query parameters for deletes.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    /// Override justification, required on locked documents.
    pub reason: Option<String>,
}

/// POST `/purchases` - Create a draft purchase.
async fn create_purchase(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Json(body): Json<CreatePurchaseRequest>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());
    let input = CreatePurchaseInput {
        vendor_id: body.vendor_id,
        purchase_date: body.purchase_date,
        items: body.items.into_iter().map(Into::into).collect(),
        total_amount: body.total_amount,
        paid_amount: body.paid_amount,
        paid_from_account_id: body.paid_from_account_id,
        advance_gold_weight: body.advance_gold_weight,
        advance_gold_purity: body.advance_gold_purity,
        exchange_gold_weight: body.exchange_gold_weight,
        exchange_gold_purity: body.exchange_gold_purity,
        notes: body.notes,
    };

    match repo.create(input).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({ "purchase": created.purchase, "items": created.items })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/purchases` - List purchases in the paginated envelope.
async fn list_purchases(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListPurchasesQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref().map(DocumentStatus::from_str) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(message)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "VALIDATION_ERROR", "message": message })),
            )
                .into_response();
        }
    };

    let page = page_request(query.page, query.page_size);
    let repo = PurchaseRepository::new((*state.db).clone());
    match repo.list(status, &page).await {
        Ok((items, total)) => {
            (StatusCode::OK, Json(Paginated::new(items, &page, total))).into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to list purchases");
            error_response(err)
        }
    }
}

/// GET `/purchases/{id}` - Get a purchase with items.
async fn get_purchase(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(found) => (
            StatusCode::OK,
            Json(json!({ "purchase": found.purchase, "items": found.items })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// PATCH `/purchases/{id}` - Edit a purchase under the lock policy.
async fn update_purchase(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePurchaseRequest>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());
    let input = UpdatePurchaseInput {
        purchase_date: body.purchase_date,
        items: body
            .items
            .map(|items| items.into_iter().map(Into::into).collect()),
        total_amount: body.total_amount,
        paid_amount: body.paid_amount,
        paid_from_account_id: body.paid_from_account_id,
        notes: body.notes,
    };

    match repo.update(id, input, &caller.0, body.reason.as_deref()).await {
        Ok((updated, warning)) => (
            StatusCode::OK,
            Json(json!({
                "purchase": updated.purchase,
                "items": updated.items,
                "warning": warning.map(|warning| warning.message),
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// DELETE `/purchases/{id}` - Delete a purchase under the lock policy.
async fn delete_purchase(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());
    match repo.delete(id, &caller.0, query.reason.as_deref()).await {
        Ok(warning) => (
            StatusCode::OK,
            Json(json!({
                "deleted": true,
                "warning": warning.map(|warning| warning.message),
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST `/purchases/{id}/finalize` - Atomically commit a draft to the
/// ledgers.
async fn finalize_purchase(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = FinalizeRepository::new((*state.db).clone(), state.valuation_purity);
    match repo.finalize_purchase(id, &caller.0).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "purchase": outcome.document,
                "ledger": {
                    "stock_movement_ids": outcome.ledger.stock_movement_ids,
                    "transaction_ids": outcome.ledger.transaction_ids,
                    "transaction_numbers": outcome.ledger.transaction_numbers,
                    "gold_entry_ids": outcome.ledger.gold_entry_ids,
                    "audit_entry_id": outcome.ledger.audit_entry_id,
                },
            })),
        )
            .into_response(),
        Err(err) => {
            error!(purchase_id = %id, error = %err, "finalize purchase failed");
            error_response(err)
        }
    }
}
