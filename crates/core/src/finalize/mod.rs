//! Finalization planning.
//!
//! Turning a draft into a financial fact touches up to five stores: the
//! stock ledger, the money ledger, the gold ledger, a locked child document,
//! and the audit log. The planners here compute the complete set of writes
//! as a pure `FinalizationPlan`; the persistence layer applies the plan in a
//! single database transaction so no partial commit is ever observable.

pub mod error;
pub mod invoice;
pub mod plan;
pub mod purchase;

#[cfg(test)]
mod planner_props;

pub use error::FinalizeError;
pub use invoice::plan_invoice_finalization;
pub use plan::{CategoryRef, FinalizationPlan, LockRequest};
pub use purchase::plan_purchase_finalization;
