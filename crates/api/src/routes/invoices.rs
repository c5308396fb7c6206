//! Invoice routes: drafts, finalization, payments.

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
use karat_core::ledger::PaymentMode;
use karat_core::payment::PaymentRequest;
use karat_db::repositories::invoices::{CreateInvoiceInput, LineItemInput, UpdateInvoiceInput};
use karat_db::{FinalizeRepository, InvoiceRepository, PaymentRepository};
use karat_shared::types::{Paginated, Purity};

use crate::AppState;
use crate::middleware::CallerIdentity;

use super::{error_response, page_request};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", post(create_invoice))
        .route("/invoices", get(list_invoices))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}", patch(update_invoice))
        .route("/invoices/{id}", delete(delete_invoice))
        .route("/invoices/{id}/finalize", post(finalize_invoice))
        .route("/invoices/{id}/payments", post(add_payment))
}

/// Request body for one invoice line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Catalog category name.
    pub category_name: Option<String>,
    /// Piece count.
    pub qty: Decimal,
    /// Weight in grams.
    pub weight: Decimal,
    /// Purity in per-mille fineness.
    pub purity: u16,
    /// Gold rate per gram.
    pub rate_per_gram: Decimal,
    /// Flat making charge.
    #[serde(default)]
    pub making_charge: Decimal,
}

impl From<LineRequest> for LineItemInput {
    fn from(line: LineRequest) -> Self {
        Self {
            description: line.description,
            category_name: line.category_name,
            qty: line.qty,
            weight: line.weight,
            purity: line.purity,
            rate_per_gram: line.rate_per_gram,
            making_charge: line.making_charge,
        }
    }
}

/// Request body for creating a draft invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Saved customer.
    pub party_id: Option<Uuid>,
    /// Walk-in customer name.
    pub walk_in_name: Option<String>,
    /// Linked job card.
    pub job_card_id: Option<Uuid>,
    /// Document date.
    pub invoice_date: NaiveDate,
    /// VAT percentage.
    pub vat_rate: Decimal,
    /// Line items.
    pub lines: Vec<LineRequest>,
}

/// Request body for editing an invoice.
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceRequest {
    /// New walk-in name.
    pub walk_in_name: Option<String>,
    /// New document date.
    pub invoice_date: Option<NaiveDate>,
    /// New VAT percentage.
    pub vat_rate: Option<Decimal>,
    /// Replacement line items.
    pub lines: Option<Vec<LineRequest>>,
    /// Override justification, required on locked documents.
    pub reason: Option<String>,
}

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
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

/// Request body for adding a payment.
#[derive(Debug, Deserialize)]
pub struct AddPaymentRequest {
    /// Payment mode: `cash`, `bank_transfer`, `card`, or `gold_exchange`.
    pub mode: String,
    /// Money amount, for money modes.
    pub amount: Option<Decimal>,
    /// Receiving account, for money modes.
    pub account_id: Option<Uuid>,
    /// Gold weight in grams, for gold exchange.
    pub gold_weight_grams: Option<Decimal>,
    /// Rate per gram, for gold exchange.
    pub rate_per_gram: Option<Decimal>,
    /// Assessed purity, for gold exchange.
    pub purity_entered: Option<u16>,
}

/// POST `/invoices` - Create a draft invoice.
async fn create_invoice(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Json(body): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    let input = CreateInvoiceInput {
        party_id: body.party_id,
        walk_in_name: body.walk_in_name,
        job_card_id: body.job_card_id,
        invoice_date: body.invoice_date,
        vat_rate: body.vat_rate,
        lines: body.lines.into_iter().map(Into::into).collect(),
    };

    match repo.create(input).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({ "invoice": created.invoice, "items": created.items })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET `/invoices` - List invoices in the paginated envelope.
async fn list_invoices(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListInvoicesQuery>,
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
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.list(status, &page).await {
        Ok((items, total)) => {
            (StatusCode::OK, Json(Paginated::new(items, &page, total))).into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to list invoices");
            error_response(err)
        }
    }
}

/// GET `/invoices/{id}` - Get an invoice with items.
async fn get_invoice(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(found) => (
            StatusCode::OK,
            Json(json!({ "invoice": found.invoice, "items": found.items })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// PATCH `/invoices/{id}` - Edit an invoice under the lock policy.
async fn update_invoice(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateInvoiceRequest>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    let input = UpdateInvoiceInput {
        walk_in_name: body.walk_in_name,
        invoice_date: body.invoice_date,
        vat_rate: body.vat_rate,
        lines: body
            .lines
            .map(|lines| lines.into_iter().map(Into::into).collect()),
    };

    match repo.update(id, input, &caller.0, body.reason.as_deref()).await {
        Ok((updated, warning)) => (
            StatusCode::OK,
            Json(json!({
                "invoice": updated.invoice,
                "items": updated.items,
                "warning": warning.map(|warning| warning.message),
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// DELETE `/invoices/{id}` - Delete an invoice under the lock policy.
async fn delete_invoice(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
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

/// POST `/invoices/{id}/finalize` - Atomically commit a draft to the
/// ledgers.
async fn finalize_invoice(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = FinalizeRepository::new((*state.db).clone(), state.valuation_purity);
    match repo.finalize_invoice(id, &caller.0).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "invoice": outcome.document,
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
            error!(invoice_id = %id, error = %err, "finalize invoice failed");
            error_response(err)
        }
    }
}

/// POST `/invoices/{id}/payments` - Apply a payment to a finalized
/// invoice.
async fn add_payment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(body): Json<AddPaymentRequest>,
) -> impl IntoResponse {
    let mode = match PaymentMode::from_str(&body.mode) {
        Ok(mode) => mode,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "VALIDATION_ERROR", "message": message })),
            )
                .into_response();
        }
    };
    let purity_entered = match body.purity_entered.map(Purity::new).transpose() {
        Ok(purity) => purity,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "VALIDATION_ERROR", "message": message })),
            )
                .into_response();
        }
    };

    let request = PaymentRequest {
        mode,
        amount: body.amount,
        account_id: body.account_id,
        gold_weight_grams: body.gold_weight_grams,
        rate_per_gram: body.rate_per_gram,
        purity_entered,
    };

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.add_payment(id, &request, &caller.0).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "invoice_id": receipt.invoice_id,
                "paid_amount": receipt.paid_amount.to_string(),
                "balance_due": receipt.balance_due.to_string(),
                "payment_status": receipt.payment_status,
                "transaction_id": receipt.transaction_id,
                "transaction_number": receipt.transaction_number,
                "gold_weight_grams": receipt.gold_weight_grams.map(|weight| weight.to_string()),
                "gold_money_value": receipt.gold_money_value.map(|value| value.to_string()),
            })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
