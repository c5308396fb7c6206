//! Finalization orchestration.
//!
//! One `finalize_*` call is one database transaction: the guarded
//! `draft → finalized` flip, every ledger append, every materialized-total
//! update, any child-document lock, and the audit entry either all commit
//! or none do. Two concurrent calls on the same document get exactly one
//! success; the loser sees "already finalized" and writes nothing.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::{error, info};
use uuid::Uuid;

use karat_core::finalize::{
    FinalizationPlan, LockRequest, plan_invoice_finalization, plan_purchase_finalization,
};
use karat_shared::Caller;
use karat_shared::types::Purity;

use crate::entities::{invoices, purchases};

use super::{StoreError, audit, gold, inventory, invoices as invoice_repo, job_cards, ledger,
    purchases as purchase_repo};

/// IDs of everything one finalize call appended.
#[derive(Debug, Clone, Default)]
pub struct GeneratedLedger {
    /// Stock movement rows.
    pub stock_movement_ids: Vec<Uuid>,
    /// Money ledger rows.
    pub transaction_ids: Vec<Uuid>,
    /// Allocated transaction numbers, same order as the IDs.
    pub transaction_numbers: Vec<String>,
    /// Gold ledger rows.
    pub gold_entry_ids: Vec<Uuid>,
    /// The audit entry.
    pub audit_entry_id: Option<Uuid>,
}

/// Result of a successful finalize.
#[derive(Debug, Clone)]
pub struct FinalizeOutcome<T> {
    /// The updated document.
    pub document: T,
    /// Everything the call appended.
    pub ledger: GeneratedLedger,
}

/// The finalization orchestrator.
#[derive(Debug, Clone)]
pub struct FinalizeRepository {
    db: DatabaseConnection,
    valuation_purity: Purity,
}

impl FinalizeRepository {
    /// Creates a new finalize repository with the shop's valuation purity.
    #[must_use]
    pub const fn new(db: DatabaseConnection, valuation_purity: Purity) -> Self {
        Self {
            db,
            valuation_purity,
        }
    }

    /// Finalizes a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown invoice, `Conflict` when it is
    /// already finalized, `Validation` when the draft is malformed. On any
    /// error no write is visible.
    pub async fn finalize_invoice(
        &self,
        id: Uuid,
        caller: &Caller,
    ) -> Result<FinalizeOutcome<invoices::Model>, StoreError> {
        let now = Utc::now();
        let at = now.into();
        let txn = self.db.begin().await?;

        let (_, doc) = invoice_repo::load_doc(&txn, id).await?;

        let category_names: Vec<String> = doc
            .lines
            .iter()
            .filter_map(|line| line.category_name.clone())
            .collect();
        let categories = inventory::find_categories_by_names(&txn, &category_names).await?;
        let plan = plan_invoice_finalization(&doc, |name| {
            categories.get(&inventory::normalize_name(name)).cloned()
        })?;

        // Optimistic guard: exactly one concurrent caller wins the flip.
        let flipped = invoices::Entity::update_many()
            .col_expr(invoices::Column::Status, Expr::value("finalized"))
            .col_expr(invoices::Column::FinalizedAt, Expr::value(at))
            .col_expr(invoices::Column::FinalizedBy, Expr::value(caller.id))
            .col_expr(
                invoices::Column::FinalizedByName,
                Expr::value(caller.name.clone()),
            )
            .col_expr(invoices::Column::UpdatedAt, Expr::value(at))
            .filter(invoices::Column::Id.eq(id))
            .filter(invoices::Column::Status.eq("draft"))
            .exec(&txn)
            .await?
            .rows_affected;
        if flipped == 0 {
            txn.rollback().await?;
            return Err(StoreError::Conflict(format!(
                "Document {} is already finalized",
                doc.invoice_number
            )));
        }

        let ledger_ids = apply_plan(&txn, &plan, caller, at).await?;
        txn.commit().await?;

        info!(
            invoice_number = %doc.invoice_number,
            movements = ledger_ids.stock_movement_ids.len(),
            transactions = ledger_ids.transaction_ids.len(),
            "finalized invoice"
        );

        let document = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "invoice",
                id: id.to_string(),
            })?;
        Ok(FinalizeOutcome {
            document,
            ledger: ledger_ids,
        })
    }

    /// Finalizes a draft purchase.
    ///
    /// Stock comes in at the shop's fixed valuation purity; the purchase
    /// locks only when nothing remains due.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown purchase, `Conflict` when it is
    /// already finalized, `Validation` when the draft is malformed. On any
    /// error no write is visible.
    pub async fn finalize_purchase(
        &self,
        id: Uuid,
        caller: &Caller,
    ) -> Result<FinalizeOutcome<purchases::Model>, StoreError> {
        let now = Utc::now();
        let at = now.into();
        let txn = self.db.begin().await?;

        let (_, doc) = purchase_repo::load_doc(&txn, id).await?;

        let category_names: Vec<String> = doc
            .items
            .iter()
            .filter_map(|item| item.category_name.clone())
            .collect();
        let categories = inventory::find_categories_by_names(&txn, &category_names).await?;
        let plan = plan_purchase_finalization(&doc, self.valuation_purity, |name| {
            categories.get(&inventory::normalize_name(name)).cloned()
        })?;

        let flipped = purchases::Entity::update_many()
            .col_expr(purchases::Column::Status, Expr::value("finalized"))
            .col_expr(purchases::Column::FinalizedAt, Expr::value(at))
            .col_expr(purchases::Column::FinalizedBy, Expr::value(caller.id))
            .col_expr(
                purchases::Column::FinalizedByName,
                Expr::value(caller.name.clone()),
            )
            .col_expr(purchases::Column::UpdatedAt, Expr::value(at))
            .filter(purchases::Column::Id.eq(id))
            .filter(purchases::Column::Status.eq("draft"))
            .exec(&txn)
            .await?
            .rows_affected;
        if flipped == 0 {
            txn.rollback().await?;
            return Err(StoreError::Conflict(format!(
                "Document {} is already finalized",
                doc.purchase_number
            )));
        }

        let ledger_ids = apply_plan(&txn, &plan, caller, at).await?;
        txn.commit().await?;

        info!(
            purchase_number = %doc.purchase_number,
            movements = ledger_ids.stock_movement_ids.len(),
            "finalized purchase"
        );

        let document = purchases::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "purchase",
                id: id.to_string(),
            })?;
        Ok(FinalizeOutcome {
            document,
            ledger: ledger_ids,
        })
    }
}

/// Applies a finalization plan inside the caller's transaction: ledger
/// appends, materialized totals, locks, audit.
pub(crate) async fn apply_plan<C: ConnectionTrait>(
    txn: &C,
    plan: &FinalizationPlan,
    caller: &Caller,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<GeneratedLedger, StoreError> {
    let mut generated = GeneratedLedger::default();

    for movement in &plan.stock_movements {
        generated
            .stock_movement_ids
            .push(inventory::append_movement(txn, movement, at).await?);
    }

    for transaction in &plan.transactions {
        let (id, number) = ledger::append(txn, transaction, at).await?;
        generated.transaction_ids.push(id);
        generated.transaction_numbers.push(number);
    }

    for entry in &plan.gold_entries {
        generated
            .gold_entry_ids
            .push(gold::append(txn, entry, at).await?);
    }

    for lock in &plan.lock_requests {
        match lock {
            LockRequest::JobCard { job_card_id } => {
                job_cards::lock_for_invoice(txn, *job_card_id, caller, at)
                    .await
                    .inspect_err(|err| {
                        error!(job_card_id = %job_card_id, error = %err, "job card lock failed");
                    })?;
            }
            LockRequest::Purchase { purchase_id } => {
                purchases::Entity::update_many()
                    .col_expr(purchases::Column::Locked, Expr::value(true))
                    .col_expr(purchases::Column::LockedAt, Expr::value(at))
                    .col_expr(
                        purchases::Column::LockedBy,
                        Expr::value(caller.name.clone()),
                    )
                    .filter(purchases::Column::Id.eq(*purchase_id))
                    .exec(txn)
                    .await?;
            }
        }
    }

    generated.audit_entry_id = Some(audit::append(txn, &plan.audit, caller, at).await?);

    Ok(generated)
}
