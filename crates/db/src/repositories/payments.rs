//! Payment settlement repository.
//!
//! One `add_payment` call is one database transaction: the guarded invoice
//! balance update, the money ledger append, the gold ledger draw-down (for
//! gold exchange), and the audit entry either all commit or none do.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use karat_core::audit::{AuditAction, AuditDraft, AuditModule};
use karat_core::ledger::PaymentMode;
use karat_core::payment::{PaymentRequest, plan_payment};
use karat_shared::Caller;

use crate::entities::invoices;

use super::{StoreError, audit, gold, invoices as invoice_repo, ledger};

/// What the caller gets back from a successful payment.
///
/// Gold fields are populated for gold exchange only; money modes never
/// carry them.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// The settled invoice.
    pub invoice_id: Uuid,
    /// Invoice `paid_amount` after the payment.
    pub paid_amount: Decimal,
    /// Invoice `balance_due` after the payment.
    pub balance_due: Decimal,
    /// Invoice payment status after the payment.
    pub payment_status: String,
    /// The appended money ledger row.
    pub transaction_id: Uuid,
    /// Its allocated number.
    pub transaction_number: String,
    /// Gold taken from the customer, grams.
    pub gold_weight_grams: Option<Decimal>,
    /// Money value of that gold.
    pub gold_money_value: Option<Decimal>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a payment to a finalized invoice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown invoice, `Validation` for any
    /// violated payment rule (overpayment, insufficient gold, walk-in gold
    /// exchange, non-positive inputs), `Conflict` for a draft invoice or a
    /// concurrent balance change. On any error no write is visible.
    pub async fn add_payment(
        &self,
        invoice_id: Uuid,
        request: &PaymentRequest,
        caller: &Caller,
    ) -> Result<PaymentReceipt, StoreError> {
        let at = Utc::now().into();
        let txn = self.db.begin().await?;

        let (_, doc) = invoice_repo::load_doc(&txn, invoice_id).await?;

        // Only consulted for gold exchange; fetched up front so the pure
        // planner stays synchronous.
        let gold_available = match (request.mode, doc.party_id) {
            (PaymentMode::GoldExchange, Some(party_id)) => {
                gold::net_balance(&txn, party_id).await?
            }
            _ => Decimal::ZERO,
        };

        let plan = plan_payment(&doc, request, |_| gold_available)?;

        // Optimistic guard against a concurrent payment on the same
        // invoice: the balance we planned against must still hold.
        let updated = invoices::Entity::update_many()
            .col_expr(
                invoices::Column::PaidAmount,
                Expr::value(plan.new_paid_amount),
            )
            .col_expr(
                invoices::Column::BalanceDue,
                Expr::value(plan.new_balance_due),
            )
            .col_expr(
                invoices::Column::PaymentStatus,
                Expr::value(plan.new_payment_status.as_str()),
            )
            .col_expr(invoices::Column::UpdatedAt, Expr::value(at))
            .filter(invoices::Column::Id.eq(invoice_id))
            .filter(invoices::Column::BalanceDue.eq(doc.balance_due))
            .exec(&txn)
            .await?
            .rows_affected;
        if updated == 0 {
            txn.rollback().await?;
            return Err(StoreError::Conflict(format!(
                "Invoice {} was settled concurrently; reload and retry",
                doc.invoice_number
            )));
        }

        let (transaction_id, transaction_number) =
            ledger::append(&txn, &plan.transaction, at).await?;

        if let Some(entry) = &plan.gold_entry {
            gold::append(&txn, entry, at).await?;
        }

        audit::append(
            &txn,
            &AuditDraft::new(
                AuditModule::Payment,
                invoice_id,
                AuditAction::AddPayment,
                json!({
                    "invoice_number": doc.invoice_number,
                    "mode": plan.mode.as_str(),
                    "amount": plan.amount_applied.to_string(),
                    "transaction_number": transaction_number,
                }),
            ),
            caller,
            at,
        )
        .await?;

        txn.commit().await?;

        info!(
            invoice_number = %doc.invoice_number,
            mode = plan.mode.as_str(),
            amount = %plan.amount_applied,
            "payment applied"
        );

        Ok(PaymentReceipt {
            invoice_id,
            paid_amount: plan.new_paid_amount,
            balance_due: plan.new_balance_due,
            payment_status: plan.new_payment_status.as_str().to_string(),
            transaction_id,
            transaction_number,
            gold_weight_grams: plan.gold_settlement.map(|gold| gold.weight_grams),
            gold_money_value: plan.gold_settlement.map(|gold| gold.money_value),
        })
    }
}
