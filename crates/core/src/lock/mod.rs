//! Cross-document lock and override policy.
//!
//! Locks are one-way: `unlocked → locked`, set only by a finalize event.
//! While locked, mutation by a non-privileged caller fails; a privileged
//! caller may proceed but receives a warning and has the override audited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use karat_shared::Caller;

/// Kind of mutation being attempted on a locked document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    /// Editing fields.
    Edit,
    /// Deleting the document.
    Delete,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Edit => write!(f, "edit"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Lock state of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockState {
    /// Whether the document is locked.
    pub locked: bool,
    /// When the lock was set.
    pub locked_at: Option<DateTime<Utc>>,
    /// Display name of whoever finalized the locking document.
    pub locked_by: Option<String>,
}

impl LockState {
    /// An unlocked state.
    #[must_use]
    pub fn unlocked() -> Self {
        Self::default()
    }

    /// A locked state.
    #[must_use]
    pub fn locked(at: DateTime<Utc>, by: impl Into<String>) -> Self {
        Self {
            locked: true,
            locked_at: Some(at),
            locked_by: Some(by.into()),
        }
    }
}

/// Warning returned when a privileged caller mutates a locked document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideWarning {
    /// Human-readable warning naming the lock and its source document.
    pub message: String,
}

/// Errors from the lock policy.
#[derive(Debug, Error)]
pub enum LockError {
    /// The caller lacks the override capability.
    #[error("{label} is locked by finalized {source_doc}: admin override required to {action} it")]
    AdminOverrideRequired {
        /// What the caller tried to mutate, e.g. "Job card JC-0015".
        label: String,
        /// The document that set the lock, e.g. "invoice INV-2026-0042".
        source_doc: String,
        /// The attempted mutation.
        action: MutationKind,
    },
}

/// Checks whether `caller` may apply `action` to a document in `state`.
///
/// Returns `Ok(None)` for unlocked documents, `Ok(Some(warning))` when a
/// privileged caller overrides a lock, and an error otherwise. The caller of
/// this function must write the matching audit entry whenever a warning is
/// returned.
///
/// # Errors
///
/// Returns `LockError::AdminOverrideRequired` when the document is locked
/// and the caller's role cannot override locks.
pub fn check_mutation(
    state: &LockState,
    action: MutationKind,
    caller: &Caller,
    label: &str,
    source: &str,
) -> Result<Option<OverrideWarning>, LockError> {
    if !state.locked {
        return Ok(None);
    }

    if caller.role.can_override_locks() {
        let by = state.locked_by.as_deref().unwrap_or("unknown");
        return Ok(Some(OverrideWarning {
            message: format!(
                "{label} is locked by finalized {source} (locked by {by}); proceeding with admin override"
            ),
        }));
    }

    Err(LockError::AdminOverrideRequired {
        label: label.to_string(),
        source_doc: source.to_string(),
        action,
    })
}
