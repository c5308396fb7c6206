//! Job card routes.
//!
//! Job cards are produced elsewhere; this surface exists so the lock and
//! override policy on cards is reachable end-to-end.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use karat_db::JobCardRepository;
use karat_db::repositories::job_cards::UpdateJobCardInput;

use crate::AppState;
use crate::middleware::CallerIdentity;

use super::error_response;

/// Creates the job card routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/job-cards/{id}", get(get_job_card))
        .route("/job-cards/{id}", patch(update_job_card))
        .route("/job-cards/{id}", delete(delete_job_card))
}

/// Request body for editing a job card.
#[derive(Debug, Deserialize)]
pub struct UpdateJobCardRequest {
    /// New customer name.
    pub customer_name: Option<String>,
    /// New workflow status.
    pub status: Option<String>,
    /// Override justification, required on locked cards.
    pub reason: Option<String>,
}

/// Query parameters for deletes.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    /// Override justification, required on locked cards.
    pub reason: Option<String>,
}

/// GET `/job-cards/{id}` - Get a job card with its lock state.
async fn get_job_card(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = JobCardRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(card) => (StatusCode::OK, Json(json!({ "job_card": card }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// PATCH `/job-cards/{id}` - Edit a job card under the lock policy.
async fn update_job_card(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateJobCardRequest>,
) -> impl IntoResponse {
    let repo = JobCardRepository::new((*state.db).clone());
    let input = UpdateJobCardInput {
        customer_name: body.customer_name,
        status: body.status,
    };

    match repo.update(id, input, &caller.0, body.reason.as_deref()).await {
        Ok((card, warning)) => (
            StatusCode::OK,
            Json(json!({
                "job_card": card,
                "warning": warning.map(|warning| warning.message),
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// DELETE `/job-cards/{id}` - Delete a job card under the lock policy.
async fn delete_job_card(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> impl IntoResponse {
    let repo = JobCardRepository::new((*state.db).clone());
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
