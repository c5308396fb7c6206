//! Repository abstractions for data access.
//!
//! Each repository wraps a `DatabaseConnection`. Operations that touch more
//! than one table run inside a single database transaction; the pure
//! planners in `karat-core` decide *what* to write, the repositories decide
//! *how*.

pub mod accounts;
pub mod audit;
pub mod finalize;
pub mod gold;
pub mod inventory;
pub mod invoices;
pub mod job_cards;
pub mod ledger;
pub mod parties;
pub mod payments;
pub mod purchases;

pub use accounts::AccountRepository;
pub use audit::AuditRepository;
pub use finalize::{FinalizeOutcome, FinalizeRepository, GeneratedLedger};
pub use gold::GoldLedgerRepository;
pub use inventory::InventoryRepository;
pub use invoices::InvoiceRepository;
pub use job_cards::JobCardRepository;
pub use ledger::MoneyLedgerRepository;
pub use parties::PartyRepository;
pub use payments::{PaymentReceipt, PaymentRepository};
pub use purchases::PurchaseRepository;

use sea_orm::DbErr;
use thiserror::Error;

use karat_shared::AppError;

/// Error type shared by all repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. "invoice".
        entity: &'static str,
        /// The missing ID.
        id: String,
    },

    /// Conflict with existing state (already finalized, duplicate name,
    /// concurrent modification).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input rejected before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A business policy forbids the operation for this caller.
    #[error("Policy violation: {0}")]
    Policy(String),

    /// Stored data failed to parse into its domain type.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound(format!("{entity}: {id}")),
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::Validation(message) => Self::Validation(message),
            StoreError::Policy(message) => Self::Policy(message),
            StoreError::Internal(message) => Self::Internal(message),
            StoreError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

impl From<karat_core::finalize::FinalizeError> for StoreError {
    fn from(err: karat_core::finalize::FinalizeError) -> Self {
        use karat_core::finalize::FinalizeError;
        match err {
            FinalizeError::AlreadyFinalized(_) => Self::Conflict(err.to_string()),
            FinalizeError::EmptyDocument(_)
            | FinalizeError::MissingPayingAccount(_)
            | FinalizeError::NonPositiveGoldWeight(_) => Self::Validation(err.to_string()),
        }
    }
}

impl From<karat_core::payment::PaymentError> for StoreError {
    fn from(err: karat_core::payment::PaymentError) -> Self {
        use karat_core::payment::PaymentError;
        match err {
            PaymentError::DocumentNotFinalized(_) => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

impl From<karat_core::lock::LockError> for StoreError {
    fn from(err: karat_core::lock::LockError) -> Self {
        Self::Policy(err.to_string())
    }
}

/// Parses a stored per-mille purity back into the domain type.
pub(crate) fn purity_from_db(stored: i32) -> Result<karat_shared::types::Purity, StoreError> {
    let per_mille = u16::try_from(stored)
        .map_err(|_| StoreError::Internal(format!("stored purity out of range: {stored}")))?;
    karat_shared::types::Purity::new(per_mille)
        .map_err(|message| StoreError::Internal(format!("stored purity invalid: {message}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use karat_core::payment::PaymentError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_store_error_maps_to_app_error() {
        let err: AppError = StoreError::NotFound {
            entity: "invoice",
            id: "abc".into(),
        }
        .into();
        assert_eq!(err.status_code(), 404);

        let err: AppError = StoreError::Conflict("already finalized".into()).into();
        assert_eq!(err.status_code(), 400);

        let err: AppError = StoreError::Policy("admin override required".into()).into();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_payment_errors_become_validation() {
        let err: StoreError = PaymentError::ExceedsBalanceDue {
            amount: dec!(600.00),
            balance_due: dec!(500.00),
        }
        .into();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(err.to_string().contains("exceeds remaining balance"));
    }

    #[test]
    fn test_purity_from_db_bounds() {
        assert!(purity_from_db(916).is_ok());
        assert!(purity_from_db(0).is_err());
        assert!(purity_from_db(70_000).is_err());
    }
}
