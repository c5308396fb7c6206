//! Audit trail payloads.
//!
//! Every finalize, override, and payment writes an append-only audit entry
//! in the same database transaction as the mutation it records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

/// Which part of the system a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditModule {
    /// Sales invoices.
    Invoice,
    /// Vendor purchases.
    Purchase,
    /// Job cards.
    JobCard,
    /// Invoice payments.
    Payment,
}

impl AuditModule {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Purchase => "purchase",
            Self::JobCard => "job_card",
            Self::Payment => "payment",
        }
    }
}

/// What happened to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Draft committed to the ledgers.
    Finalize,
    /// Ordinary edit of an unlocked document.
    Edit,
    /// Ordinary delete of an unlocked document.
    Delete,
    /// Payment applied to an invoice.
    AddPayment,
    /// Privileged edit of a locked document.
    AdminOverrideEdit,
    /// Privileged delete of a locked document.
    AdminOverrideDelete,
}

impl AuditAction {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Finalize => "finalize",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::AddPayment => "add_payment",
            Self::AdminOverrideEdit => "admin_override_edit",
            Self::AdminOverrideDelete => "admin_override_delete",
        }
    }
}

/// An audit entry awaiting persistence.
#[derive(Debug, Clone)]
pub struct AuditDraft {
    /// Module the record belongs to.
    pub module: AuditModule,
    /// The record's ID.
    pub record_id: Uuid,
    /// What happened.
    pub action: AuditAction,
    /// Structured details of the change.
    pub changes: Value,
}

impl AuditDraft {
    /// Creates an audit draft.
    #[must_use]
    pub fn new(module: AuditModule, record_id: Uuid, action: AuditAction, changes: Value) -> Self {
        Self {
            module,
            record_id,
            action,
            changes,
        }
    }
}

/// Builds the `changes` payload for an admin override on a document.
#[must_use]
pub fn override_changes(
    reason: &str,
    locked_at: Option<DateTime<Utc>>,
    locked_by: Option<&str>,
    changes: Value,
) -> Value {
    json!({
        "reason": reason,
        "locked_at": locked_at.map(|t| t.to_rfc3339()),
        "locked_by": locked_by,
        "changes": changes,
    })
}

/// Builds the `changes` payload for an admin override delete of a job card.
#[must_use]
pub fn jobcard_override_changes(
    reason: &str,
    locked_at: Option<DateTime<Utc>>,
    locked_by: Option<&str>,
    jobcard_number: &str,
    customer_name: &str,
) -> Value {
    json!({
        "reason": reason,
        "locked_at": locked_at.map(|t| t.to_rfc3339()),
        "locked_by": locked_by,
        "jobcard_number": jobcard_number,
        "customer_name": customer_name,
    })
}
