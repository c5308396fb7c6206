//! The finalization plan and its building blocks.

use uuid::Uuid;

use crate::audit::AuditDraft;
use crate::ledger::{GoldEntryDraft, StockMovementDraft, TransactionDraft};

/// A catalog category as needed for movement resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    /// Category ID.
    pub id: Uuid,
    /// Canonical catalog name.
    pub name: String,
}

/// A lock the finalize event must set on another document.
///
/// Locks travel as messages inside the plan so the orchestrator stays
/// decoupled from the lock manager while both commit in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockRequest {
    /// Lock the linked job card and mark it invoiced.
    JobCard {
        /// The job card to lock.
        job_card_id: Uuid,
    },
    /// Lock a fully paid purchase.
    Purchase {
        /// The purchase to lock.
        purchase_id: Uuid,
    },
}

/// Everything one finalize call writes, computed up front.
#[derive(Debug, Clone)]
pub struct FinalizationPlan {
    /// The document being finalized.
    pub document_id: Uuid,
    /// Stock movements to append.
    pub stock_movements: Vec<StockMovementDraft>,
    /// Money ledger transactions to append.
    pub transactions: Vec<TransactionDraft>,
    /// Gold ledger entries to append.
    pub gold_entries: Vec<GoldEntryDraft>,
    /// Locks to set on other documents.
    pub lock_requests: Vec<LockRequest>,
    /// The audit entry recording the finalize.
    pub audit: AuditDraft,
}
