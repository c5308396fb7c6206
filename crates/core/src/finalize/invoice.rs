//! Invoice finalization planning.

use serde_json::json;

use crate::audit::{AuditAction, AuditDraft, AuditModule};
use crate::document::{DocumentStatus, InvoiceDoc, LineItem};
use crate::ledger::{
    LedgerReference, MovementType, StockMovementDraft, TransactionDraft, TransactionType,
};

use super::error::FinalizeError;
use super::plan::{CategoryRef, FinalizationPlan, LockRequest};

/// Display name used when an item names no category and has no description.
pub const UNCATEGORIZED_ITEM: &str = "Uncategorized item";

/// Money ledger category for the receivable created by an invoice.
pub const SALES_INVOICE_CATEGORY: &str = "Sales Invoice";

/// Plans the finalization of a sales invoice.
///
/// Every line with weight leaves stock through a Stock OUT movement, even
/// when the catalog has no matching category; the receivable debit is
/// skipped for walk-in customers; a linked job card gets a lock request.
///
/// # Errors
///
/// Returns an error when the invoice is not a draft or has no lines. No
/// partial plan is ever returned.
pub fn plan_invoice_finalization<F>(
    invoice: &InvoiceDoc,
    category_lookup: F,
) -> Result<FinalizationPlan, FinalizeError>
where
    F: Fn(&str) -> Option<CategoryRef>,
{
    if invoice.status != DocumentStatus::Draft {
        return Err(FinalizeError::AlreadyFinalized(
            invoice.invoice_number.clone(),
        ));
    }
    if invoice.lines.is_empty() {
        return Err(FinalizeError::EmptyDocument(invoice.invoice_number.clone()));
    }

    let reference = LedgerReference::invoice(invoice.id);

    let stock_movements = invoice
        .lines
        .iter()
        .filter(|line| line.weight > rust_decimal::Decimal::ZERO)
        .map(|line| {
            let (category_id, category_name) = resolve_category(line, &category_lookup);
            StockMovementDraft {
                category_id,
                category_name,
                movement_type: MovementType::Out,
                qty_delta: -line.qty,
                weight_delta: -line.weight,
                purity: line.purity,
                reference,
            }
        })
        .collect();

    // Walk-in sales settle at the counter; only saved customers get a
    // receivable on the money ledger.
    let transactions = invoice
        .party_id
        .map(|party_id| {
            vec![TransactionDraft {
                account_id: None,
                party_id: Some(party_id),
                transaction_type: TransactionType::Debit,
                amount: invoice.grand_total,
                category: SALES_INVOICE_CATEGORY.to_string(),
                payment_mode: None,
                reference,
            }]
        })
        .unwrap_or_default();

    let lock_requests = invoice
        .job_card_id
        .map(|job_card_id| vec![LockRequest::JobCard { job_card_id }])
        .unwrap_or_default();

    let audit = AuditDraft::new(
        AuditModule::Invoice,
        invoice.id,
        AuditAction::Finalize,
        json!({
            "invoice_number": invoice.invoice_number,
            "grand_total": invoice.grand_total.to_string(),
            "line_count": invoice.lines.len(),
        }),
    );

    Ok(FinalizationPlan {
        document_id: invoice.id,
        stock_movements,
        transactions,
        gold_entries: Vec::new(),
        lock_requests,
        audit,
    })
}

/// Resolves the category reference for a line.
///
/// Fallback chain: catalog match → item's category text → item description →
/// generic placeholder. The movement is created in every case so the stock
/// trail stays complete regardless of catalog drift.
fn resolve_category<F>(line: &LineItem, category_lookup: &F) -> (Option<uuid::Uuid>, String)
where
    F: Fn(&str) -> Option<CategoryRef>,
{
    if let Some(name) = line
        .category_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        return match category_lookup(name) {
            Some(category) => (Some(category.id), category.name),
            None => (None, name.to_string()),
        };
    }

    let description = line.description.trim();
    if description.is_empty() {
        (None, UNCATEGORIZED_ITEM.to_string())
    } else {
        (None, description.to_string())
    }
}
