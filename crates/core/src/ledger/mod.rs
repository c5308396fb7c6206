//! Draft entries for the three append-only ledgers.
//!
//! The finalization and payment planners emit these drafts; the persistence
//! layer appends them inside a single database transaction. Nothing in this
//! module performs I/O.

pub mod types;

pub use types::{
    GoldEntryDraft, GoldEntryType, GoldPurpose, LedgerReference, MovementType, PaymentMode,
    ReferenceType, StockMovementDraft, TransactionDraft, TransactionType,
};
