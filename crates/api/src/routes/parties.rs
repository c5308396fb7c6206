//! Party routes: registry, derived balances, outstanding report.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use karat_core::party::PartyType;
use karat_db::repositories::parties::CreatePartyInput;
use karat_db::{GoldLedgerRepository, MoneyLedgerRepository, PartyRepository};
use karat_shared::types::Paginated;

use crate::AppState;
use crate::middleware::CallerIdentity;

use super::{error_response, page_request};

/// Creates the party routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/parties", post(create_party))
        .route("/parties", get(list_parties))
        .route("/parties/{id}", get(get_party))
        .route("/parties/{id}/summary", get(party_summary))
        .route("/parties/{id}/gold-ledger", get(party_gold_ledger))
        .route("/parties/{id}/transactions", get(party_transactions))
        .route("/reports/outstanding", get(outstanding))
}

/// Request body for creating a party.
#[derive(Debug, Deserialize)]
pub struct CreatePartyRequest {
    /// Display name.
    pub name: String,
    /// `customer`, `vendor`, or `worker`.
    pub party_type: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Query parameters for paginated lists.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

/// POST `/parties` - Create a party.
async fn create_party(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Json(body): Json<CreatePartyRequest>,
) -> impl IntoResponse {
    let party_type = match PartyType::from_str(&body.party_type) {
        Ok(party_type) => party_type,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "VALIDATION_ERROR", "message": message })),
            )
                .into_response();
        }
    };

    let repo = PartyRepository::new((*state.db).clone());
    match repo
        .create(CreatePartyInput {
            name: body.name,
            party_type,
            phone: body.phone,
            address: body.address,
        })
        .await
    {
        Ok(party) => (StatusCode::CREATED, Json(json!({ "party": party }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/parties` - List parties in the paginated envelope.
async fn list_parties(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let page = page_request(query.page, query.page_size);
    let repo = PartyRepository::new((*state.db).clone());
    match repo.list(&page).await {
        Ok((items, total)) => {
            (StatusCode::OK, Json(Paginated::new(items, &page, total))).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// GET `/parties/{id}` - Get a party.
async fn get_party(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PartyRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(party) => (StatusCode::OK, Json(json!({ "party": party }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/parties/{id}/summary` - Derived gold and money positions.
async fn party_summary(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PartyRepository::new((*state.db).clone());
    let party = match repo.get(id).await {
        Ok(party) => party,
        Err(err) => return error_response(err),
    };
    match repo.summary(id).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "party": party,
                "gold": summary.gold,
                "money": summary.money,
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/parties/{id}/gold-ledger` - A party's gold ledger entries.
async fn party_gold_ledger(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = GoldLedgerRepository::new((*state.db).clone());
    match repo.list_for_party(id).await {
        Ok(entries) => (StatusCode::OK, Json(json!({ "entries": entries }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/parties/{id}/transactions` - A party's money ledger entries.
async fn party_transactions(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MoneyLedgerRepository::new((*state.db).clone());
    match repo.list_for_party(id).await {
        Ok(entries) => (StatusCode::OK, Json(json!({ "transactions": entries }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/reports/outstanding` - Outstanding balances with aging buckets.
async fn outstanding(
    State(state): State<AppState>,
    _caller: CallerIdentity,
) -> impl IntoResponse {
    let repo = PartyRepository::new((*state.db).clone());
    match repo.outstanding(Utc::now().date_naive()).await {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "parties": report.parties,
                "summary": report.summary,
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
