//! Invoice payment settlement.
//!
//! Supports cash, bank transfer, card, and old-gold exchange. All
//! validation happens here, before any write; the persistence layer applies
//! the resulting `PaymentPlan` atomically.

pub mod error;
pub mod settle;
pub mod types;

pub use error::PaymentError;
pub use settle::plan_payment;
pub use types::{GoldSettlement, PaymentPlan, PaymentRequest};
