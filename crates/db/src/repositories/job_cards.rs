//! Job card repository.
//!
//! Job cards are produced elsewhere; this engine locks them when a linked
//! invoice finalizes and enforces the override policy on later mutation.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use karat_core::audit::{
    AuditAction, AuditDraft, AuditModule, jobcard_override_changes, override_changes,
};
use karat_core::lock::{LockState, MutationKind, OverrideWarning, check_mutation};
use karat_shared::Caller;

use crate::entities::{invoices, job_cards};

use super::{StoreError, audit};

/// Status a job card takes when its linked invoice finalizes.
pub const JOB_CARD_INVOICED_STATUS: &str = "invoiced";

/// Input for editing a job card.
#[derive(Debug, Clone, Default)]
pub struct UpdateJobCardInput {
    /// New customer name.
    pub customer_name: Option<String>,
    /// New workflow status.
    pub status: Option<String>,
}

/// Job card repository.
#[derive(Debug, Clone)]
pub struct JobCardRepository {
    db: DatabaseConnection,
}

impl JobCardRepository {
    /// Creates a new job card repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a job card by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the card does not exist.
    pub async fn get(&self, id: Uuid) -> Result<job_cards::Model, StoreError> {
        load(&self.db, id).await
    }

    /// Edits a job card under the lock policy.
    ///
    /// # Errors
    ///
    /// Returns `Policy` when the card is locked and the caller cannot
    /// override.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateJobCardInput,
        caller: &Caller,
        reason: Option<&str>,
    ) -> Result<(job_cards::Model, Option<OverrideWarning>), StoreError> {
        let card = load(&self.db, id).await?;
        let label = format!("Job card {}", card.job_card_number);
        let source = locking_invoice_label(&self.db, card.id).await?;

        let warning = check_mutation(
            &lock_state(&card),
            MutationKind::Edit,
            caller,
            &label,
            &source,
        )?;

        let at = Utc::now().into();
        let txn = self.db.begin().await?;

        let mut changes = serde_json::Map::new();
        if let Some(name) = &input.customer_name {
            changes.insert(
                "customer_name".into(),
                json!({ "from": card.customer_name, "to": name }),
            );
        }
        if let Some(status) = &input.status {
            changes.insert("status".into(), json!({ "from": card.status, "to": status }));
        }

        let (action, payload) = if warning.is_some() {
            let reason = reason.ok_or_else(|| {
                StoreError::Validation("override reason is required".into())
            })?;
            (
                AuditAction::AdminOverrideEdit,
                override_changes(
                    reason,
                    card.locked_at.map(Into::into),
                    card.locked_by.as_deref(),
                    serde_json::Value::Object(changes),
                ),
            )
        } else {
            (AuditAction::Edit, serde_json::Value::Object(changes))
        };
        audit::append(
            &txn,
            &AuditDraft::new(AuditModule::JobCard, card.id, action, payload),
            caller,
            at,
        )
        .await?;

        let mut active: job_cards::ActiveModel = card.into();
        if let Some(name) = input.customer_name {
            active.customer_name = Set(name);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(at);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok((updated, warning))
    }

    /// Deletes a job card under the lock policy.
    ///
    /// Override deletes audit the card's number and customer name so the
    /// record stays reconstructible.
    ///
    /// # Errors
    ///
    /// Returns `Policy` when the card is locked and the caller cannot
    /// override.
    pub async fn delete(
        &self,
        id: Uuid,
        caller: &Caller,
        reason: Option<&str>,
    ) -> Result<Option<OverrideWarning>, StoreError> {
        let card = load(&self.db, id).await?;
        let label = format!("Job card {}", card.job_card_number);
        let source = locking_invoice_label(&self.db, card.id).await?;

        let warning = check_mutation(
            &lock_state(&card),
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
                jobcard_override_changes(
                    reason,
                    card.locked_at.map(Into::into),
                    card.locked_by.as_deref(),
                    &card.job_card_number,
                    &card.customer_name,
                ),
            )
        } else {
            (
                AuditAction::Delete,
                json!({ "jobcard_number": card.job_card_number }),
            )
        };
        audit::append(
            &txn,
            &AuditDraft::new(AuditModule::JobCard, card.id, action, payload),
            caller,
            at,
        )
        .await?;

        job_cards::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(warning)
    }
}

pub(crate) fn lock_state(card: &job_cards::Model) -> LockState {
    LockState {
        locked: card.locked,
        locked_at: card.locked_at.map(Into::into),
        locked_by: card.locked_by.clone(),
    }
}

async fn load<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<job_cards::Model, StoreError> {
    job_cards::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "job card",
            id: id.to_string(),
        })
}

/// Finds the finalized invoice that locked this card, for warning text.
async fn locking_invoice_label<C: ConnectionTrait>(
    conn: &C,
    card_id: Uuid,
) -> Result<String, StoreError> {
    let invoice = invoices::Entity::find()
        .filter(invoices::Column::JobCardId.eq(card_id))
        .filter(invoices::Column::Status.eq("finalized"))
        .one(conn)
        .await?;
    Ok(invoice.map_or_else(
        || "a finalized invoice".to_string(),
        |invoice| format!("invoice {}", invoice.invoice_number),
    ))
}

/// Locks a job card and marks it invoiced, inside a finalize transaction.
pub(crate) async fn lock_for_invoice<C: ConnectionTrait>(
    conn: &C,
    card_id: Uuid,
    caller: &Caller,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<(), StoreError> {
    let card = load(conn, card_id).await?;
    let mut active: job_cards::ActiveModel = card.into();
    active.locked = Set(true);
    active.locked_at = Set(Some(at));
    active.locked_by = Set(Some(caller.name.clone()));
    active.status = Set(JOB_CARD_INVOICED_STATUS.to_string());
    active.updated_at = Set(at);
    active.update(conn).await?;
    Ok(())
}
