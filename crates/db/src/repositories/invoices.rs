//! Invoice repository: draft CRUD under the lock and override policy.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use karat_core::audit::{AuditAction, AuditDraft, AuditModule, override_changes};
use karat_core::document::{
    DocumentStatus, InvoiceDoc, LineItem, PaymentStatus, compute_invoice_totals,
};
use karat_core::lock::{LockState, MutationKind, OverrideWarning, check_mutation};
use karat_shared::types::{PageRequest, Purity, round_money, round_weight};
use karat_shared::Caller;

use crate::entities::{invoice_items, invoices, job_cards, parties};

use super::{StoreError, audit, purity_from_db};

/// Input for one invoice line.
#[derive(Debug, Clone)]
pub struct LineItemInput {
    /// Free-text description of the piece.
    pub description: String,
    /// Catalog category name.
    pub category_name: Option<String>,
    /// Piece count, must be positive.
    pub qty: Decimal,
    /// Weight in grams; zero for service-only lines.
    pub weight: Decimal,
    /// Purity in per-mille fineness.
    pub purity: u16,
    /// Gold rate per gram.
    pub rate_per_gram: Decimal,
    /// Flat making charge.
    pub making_charge: Decimal,
}

/// Input for creating a draft invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Saved customer, if any.
    pub party_id: Option<Uuid>,
    /// Walk-in customer name when no saved party is referenced.
    pub walk_in_name: Option<String>,
    /// Linked job card, if the sale closes one.
    pub job_card_id: Option<Uuid>,
    /// Document date.
    pub invoice_date: NaiveDate,
    /// VAT percentage.
    pub vat_rate: Decimal,
    /// Line items.
    pub lines: Vec<LineItemInput>,
}

/// Input for editing an invoice.
///
/// Drafts accept every field; finalized invoices accept only
/// `walk_in_name`, and only under admin override.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoiceInput {
    /// New walk-in name.
    pub walk_in_name: Option<String>,
    /// New document date.
    pub invoice_date: Option<NaiveDate>,
    /// New VAT percentage.
    pub vat_rate: Option<Decimal>,
    /// Replacement line items.
    pub lines: Option<Vec<LineItemInput>>,
}

/// An invoice with its line items.
#[derive(Debug, Clone)]
pub struct InvoiceWithItems {
    /// Invoice header.
    pub invoice: invoices::Model,
    /// Line items.
    pub items: Vec<invoice_items::Model>,
}

/// Invoice repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft invoice with computed totals.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for malformed input, `NotFound` for unknown
    /// references.
    pub async fn create(&self, input: CreateInvoiceInput) -> Result<InvoiceWithItems, StoreError> {
        if input.party_id.is_none()
            && input
                .walk_in_name
                .as_deref()
                .is_none_or(|name| name.trim().is_empty())
        {
            return Err(StoreError::Validation(
                "counterparty is required: party_id or walk_in_name".into(),
            ));
        }
        if input.vat_rate < Decimal::ZERO {
            return Err(StoreError::Validation("vat_rate cannot be negative".into()));
        }

        if let Some(party_id) = input.party_id {
            ensure_party_exists(&self.db, party_id).await?;
        }
        if let Some(job_card_id) = input.job_card_id {
            job_cards::Entity::find_by_id(job_card_id)
                .one(&self.db)
                .await?
                .ok_or(StoreError::NotFound {
                    entity: "job card",
                    id: job_card_id.to_string(),
                })?;
        }

        let lines = validate_lines(&input.lines)?;
        let totals = compute_invoice_totals(&lines, input.vat_rate);

        let now = Utc::now();
        let at = now.into();
        let txn = self.db.begin().await?;

        let invoice_number = next_invoice_number(&txn, now.year()).await?;
        let invoice_id = Uuid::new_v4();
        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            invoice_number: Set(invoice_number.clone()),
            party_id: Set(input.party_id),
            walk_in_name: Set(input.walk_in_name.map(|name| name.trim().to_string())),
            job_card_id: Set(input.job_card_id),
            status: Set(DocumentStatus::Draft.as_str().to_string()),
            payment_status: Set(PaymentStatus::Unpaid.as_str().to_string()),
            invoice_date: Set(input.invoice_date),
            vat_rate: Set(input.vat_rate),
            subtotal: Set(totals.subtotal),
            vat_amount: Set(totals.vat_amount),
            grand_total: Set(totals.grand_total),
            paid_amount: Set(Decimal::ZERO),
            balance_due: Set(totals.grand_total),
            finalized_at: Set(None),
            finalized_by: Set(None),
            finalized_by_name: Set(None),
            created_at: Set(at),
            updated_at: Set(at),
        };
        let invoice = invoice.insert(&txn).await?;
        let items = insert_items(&txn, invoice_id, &input.lines, at).await?;

        txn.commit().await?;
        info!(invoice_number = %invoice_number, "created draft invoice");

        Ok(InvoiceWithItems { invoice, items })
    }

    /// Gets an invoice with its items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the invoice does not exist.
    pub async fn get(&self, id: Uuid) -> Result<InvoiceWithItems, StoreError> {
        let (invoice, items) = load(&self.db, id).await?;
        Ok(InvoiceWithItems { invoice, items })
    }

    /// Lists invoices, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        status: Option<DocumentStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<invoices::Model>, u64), StoreError> {
        let mut query = invoices::Entity::find();
        if let Some(status) = status {
            query = query.filter(invoices::Column::Status.eq(status.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(invoices::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((items, total))
    }

    /// Edits an invoice under the lock policy.
    ///
    /// Draft invoices accept every field from any caller. Finalized
    /// invoices require the override capability, accept only
    /// `walk_in_name`, return a warning, and write an
    /// `admin_override_edit` audit entry.
    ///
    /// # Errors
    ///
    /// Returns `Policy` when the caller cannot override the lock,
    /// `Validation` for fields that cannot change after finalize.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateInvoiceInput,
        caller: &Caller,
        reason: Option<&str>,
    ) -> Result<(InvoiceWithItems, Option<OverrideWarning>), StoreError> {
        let (invoice, _) = load(&self.db, id).await?;
        let label = format!("Invoice {}", invoice.invoice_number);
        let source = format!("invoice {}", invoice.invoice_number);

        let warning = check_mutation(
            &lock_state(&invoice),
            MutationKind::Edit,
            caller,
            &label,
            &source,
        )?;

        let now = Utc::now();
        let at = now.into();
        let txn = self.db.begin().await?;

        let updated = if warning.is_some() {
            let reason = reason.ok_or_else(|| {
                StoreError::Validation("override reason is required".into())
            })?;
            if input.lines.is_some() || input.vat_rate.is_some() || input.invoice_date.is_some() {
                return Err(StoreError::Validation(
                    "line items and totals cannot change after finalize; only walk_in_name".into(),
                ));
            }
            let new_name = input.walk_in_name.clone().ok_or_else(|| {
                StoreError::Validation("nothing to change: walk_in_name is required".into())
            })?;

            let changes = json!({
                "walk_in_name": { "from": invoice.walk_in_name, "to": new_name },
            });
            let payload = override_changes(
                reason,
                invoice.finalized_at.map(Into::into),
                invoice.finalized_by_name.as_deref(),
                changes,
            );
            audit::append(
                &txn,
                &AuditDraft::new(
                    AuditModule::Invoice,
                    invoice.id,
                    AuditAction::AdminOverrideEdit,
                    payload,
                ),
                caller,
                at,
            )
            .await?;

            let mut active: invoices::ActiveModel = invoice.into();
            active.walk_in_name = Set(Some(new_name));
            active.updated_at = Set(at);
            active.update(&txn).await?
        } else {
            apply_draft_update(&txn, invoice, &input, caller, at).await?
        };

        let items = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(id))
            .all(&txn)
            .await?;
        txn.commit().await?;

        Ok((
            InvoiceWithItems {
                invoice: updated,
                items,
            },
            warning,
        ))
    }

    /// Deletes an invoice under the lock policy.
    ///
    /// # Errors
    ///
    /// Returns `Policy` when the caller cannot override the lock.
    pub async fn delete(
        &self,
        id: Uuid,
        caller: &Caller,
        reason: Option<&str>,
    ) -> Result<Option<OverrideWarning>, StoreError> {
        let (invoice, _) = load(&self.db, id).await?;
        let label = format!("Invoice {}", invoice.invoice_number);
        let source = format!("invoice {}", invoice.invoice_number);

        let warning = check_mutation(
            &lock_state(&invoice),
            MutationKind::Delete,
            caller,
            &label,
            &source,
        )?;

        let at = Utc::now().into();
        let txn = self.db.begin().await?;

        let (action, payload) = if warning.is_some() {
            let reason = reason.ok_or_else(|| {
                StoreError::Validation("override reason is required".into())
            })?;
            (
                AuditAction::AdminOverrideDelete,
                override_changes(
                    reason,
                    invoice.finalized_at.map(Into::into),
                    invoice.finalized_by_name.as_deref(),
                    json!({
                        "invoice_number": invoice.invoice_number,
                        "grand_total": invoice.grand_total.to_string(),
                    }),
                ),
            )
        } else {
            (
                AuditAction::Delete,
                json!({ "invoice_number": invoice.invoice_number }),
            )
        };

        audit::append(
            &txn,
            &AuditDraft::new(AuditModule::Invoice, invoice.id, action, payload),
            caller,
            at,
        )
        .await?;

        invoice_items::Entity::delete_many()
            .filter(invoice_items::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;
        invoices::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(warning)
    }
}

/// The lock state a finalized invoice presents to the override policy.
pub(crate) fn lock_state(invoice: &invoices::Model) -> LockState {
    if invoice.status == DocumentStatus::Finalized.as_str() {
        LockState {
            locked: true,
            locked_at: invoice.finalized_at.map(Into::into),
            locked_by: invoice.finalized_by_name.clone(),
        }
    } else {
        LockState::unlocked()
    }
}

/// Loads an invoice and its items.
pub(crate) async fn load<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<(invoices::Model, Vec<invoice_items::Model>), StoreError> {
    let invoice = invoices::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "invoice",
            id: id.to_string(),
        })?;
    let items = invoice_items::Entity::find()
        .filter(invoice_items::Column::InvoiceId.eq(id))
        .order_by_asc(invoice_items::Column::CreatedAt)
        .all(conn)
        .await?;
    Ok((invoice, items))
}

/// Loads an invoice as the planners' document view.
pub(crate) async fn load_doc<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<(invoices::Model, InvoiceDoc), StoreError> {
    let (invoice, items) = load(conn, id).await?;
    let doc = to_doc(&invoice, &items)?;
    Ok((invoice, doc))
}

/// Converts entity rows into the planners' document view.
pub(crate) fn to_doc(
    invoice: &invoices::Model,
    items: &[invoice_items::Model],
) -> Result<InvoiceDoc, StoreError> {
    let status = DocumentStatus::from_str(&invoice.status).map_err(StoreError::Internal)?;
    let payment_status =
        PaymentStatus::from_str(&invoice.payment_status).map_err(StoreError::Internal)?;

    let lines = items
        .iter()
        .map(|item| {
            Ok(LineItem {
                description: item.description.clone(),
                category_name: item.category_name.clone(),
                qty: item.qty,
                weight: item.weight,
                purity: purity_from_db(item.purity)?,
                rate_per_gram: item.rate_per_gram,
                making_charge: item.making_charge,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(InvoiceDoc {
        id: invoice.id,
        invoice_number: invoice.invoice_number.clone(),
        party_id: invoice.party_id,
        walk_in_name: invoice.walk_in_name.clone(),
        job_card_id: invoice.job_card_id,
        status,
        payment_status,
        invoice_date: invoice.invoice_date,
        lines,
        subtotal: invoice.subtotal,
        vat_amount: invoice.vat_amount,
        grand_total: invoice.grand_total,
        paid_amount: invoice.paid_amount,
        balance_due: invoice.balance_due,
    })
}

/// Validates raw line inputs into core line items.
pub(crate) fn validate_lines(inputs: &[LineItemInput]) -> Result<Vec<LineItem>, StoreError> {
    inputs
        .iter()
        .map(|input| {
            if input.qty <= Decimal::ZERO {
                return Err(StoreError::Validation(format!(
                    "line quantity must be positive, got {}",
                    input.qty
                )));
            }
            if input.weight < Decimal::ZERO {
                return Err(StoreError::Validation(format!(
                    "line weight cannot be negative, got {}",
                    input.weight
                )));
            }
            if input.rate_per_gram < Decimal::ZERO || input.making_charge < Decimal::ZERO {
                return Err(StoreError::Validation(
                    "rates and charges cannot be negative".into(),
                ));
            }
            let purity = Purity::new(input.purity).map_err(StoreError::Validation)?;

            Ok(LineItem {
                description: input.description.trim().to_string(),
                category_name: input.category_name.clone(),
                qty: input.qty,
                weight: round_weight(input.weight),
                purity,
                rate_per_gram: round_money(input.rate_per_gram),
                making_charge: round_money(input.making_charge),
            })
        })
        .collect()
}

/// Allocates the next `INV-YYYY-NNNN` number.
async fn next_invoice_number<C: ConnectionTrait>(conn: &C, year: i32) -> Result<String, StoreError> {
    let prefix = format!("INV-{year}-");
    let latest = invoices::Entity::find()
        .filter(invoices::Column::InvoiceNumber.starts_with(&prefix))
        .order_by_desc(invoices::Column::InvoiceNumber)
        .one(conn)
        .await?;

    let next = latest
        .and_then(|invoice| invoice.invoice_number[prefix.len()..].parse::<u32>().ok())
        .unwrap_or(0)
        + 1;
    Ok(format!("{prefix}{next:04}"))
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
    inputs: &[LineItemInput],
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<Vec<invoice_items::Model>, StoreError> {
    let mut items = Vec::with_capacity(inputs.len());
    for input in inputs {
        let item = invoice_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            description: Set(input.description.trim().to_string()),
            category_name: Set(input.category_name.clone()),
            qty: Set(input.qty),
            weight: Set(round_weight(input.weight)),
            purity: Set(i32::from(input.purity)),
            rate_per_gram: Set(round_money(input.rate_per_gram)),
            making_charge: Set(round_money(input.making_charge)),
            created_at: Set(at),
        };
        items.push(item.insert(conn).await?);
    }
    Ok(items)
}

async fn apply_draft_update<C: ConnectionTrait>(
    txn: &C,
    invoice: invoices::Model,
    input: &UpdateInvoiceInput,
    caller: &Caller,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<invoices::Model, StoreError> {
    let invoice_id = invoice.id;
    let mut changed_fields = Vec::new();

    let mut active: invoices::ActiveModel = invoice.into();

    if let Some(name) = &input.walk_in_name {
        active.walk_in_name = Set(Some(name.trim().to_string()));
        changed_fields.push("walk_in_name");
    }
    if let Some(date) = input.invoice_date {
        active.invoice_date = Set(date);
        changed_fields.push("invoice_date");
    }
    if let Some(vat_rate) = input.vat_rate {
        if vat_rate < Decimal::ZERO {
            return Err(StoreError::Validation("vat_rate cannot be negative".into()));
        }
        active.vat_rate = Set(vat_rate);
        changed_fields.push("vat_rate");
    }

    if let Some(line_inputs) = &input.lines {
        invoice_items::Entity::delete_many()
            .filter(invoice_items::Column::InvoiceId.eq(invoice_id))
            .exec(txn)
            .await?;
        insert_items(txn, invoice_id, line_inputs, at).await?;
        changed_fields.push("lines");
    }

    // Recompute totals from whatever the items now are.
    let items = invoice_items::Entity::find()
        .filter(invoice_items::Column::InvoiceId.eq(invoice_id))
        .all(txn)
        .await?;
    let lines = items
        .iter()
        .map(|item| {
            Ok(LineItem {
                description: item.description.clone(),
                category_name: item.category_name.clone(),
                qty: item.qty,
                weight: item.weight,
                purity: purity_from_db(item.purity)?,
                rate_per_gram: item.rate_per_gram,
                making_charge: item.making_charge,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    let vat_rate = match &active.vat_rate {
        sea_orm::ActiveValue::Set(rate) | sea_orm::ActiveValue::Unchanged(rate) => *rate,
        sea_orm::ActiveValue::NotSet => Decimal::ZERO,
    };
    let totals = compute_invoice_totals(&lines, vat_rate);
    active.subtotal = Set(totals.subtotal);
    active.vat_amount = Set(totals.vat_amount);
    active.grand_total = Set(totals.grand_total);
    active.balance_due = Set(totals.grand_total);
    active.updated_at = Set(at);

    let updated = active.update(txn).await?;

    audit::append(
        txn,
        &AuditDraft::new(
            AuditModule::Invoice,
            invoice_id,
            AuditAction::Edit,
            json!({ "fields": changed_fields }),
        ),
        caller,
        at,
    )
    .await?;

    Ok(updated)
}

async fn ensure_party_exists<C: ConnectionTrait>(conn: &C, party_id: Uuid) -> Result<(), StoreError> {
    parties::Entity::find_by_id(party_id)
        .one(conn)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "party",
            id: party_id.to_string(),
        })?;
    Ok(())
}
