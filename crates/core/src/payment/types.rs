//! Payment request and plan types.

use rust_decimal::Decimal;
use uuid::Uuid;

use karat_shared::types::Purity;

use crate::document::PaymentStatus;
use crate::ledger::{GoldEntryDraft, PaymentMode, TransactionDraft};

/// A validated payment request against an invoice.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// How the payment is being made.
    pub mode: PaymentMode,
    /// Money amount, required for money modes.
    pub amount: Option<Decimal>,
    /// Receiving account, required for money modes.
    pub account_id: Option<Uuid>,
    /// Gold weight in grams, required for gold exchange.
    pub gold_weight_grams: Option<Decimal>,
    /// Rate per gram the gold is valued at, required for gold exchange.
    pub rate_per_gram: Option<Decimal>,
    /// Purity of the customer's gold as assessed at the counter.
    pub purity_entered: Option<Purity>,
}

/// Gold-specific settlement figures, absent for money modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoldSettlement {
    /// Weight taken from the customer, grams.
    pub weight_grams: Decimal,
    /// Rate per gram applied.
    pub rate_per_gram: Decimal,
    /// Purity recorded for the metal.
    pub purity: Purity,
    /// `weight_grams × rate_per_gram`, rounded to money.
    pub money_value: Decimal,
}

/// Everything one payment writes and updates, computed up front.
#[derive(Debug, Clone)]
pub struct PaymentPlan {
    /// The invoice being settled.
    pub invoice_id: Uuid,
    /// Mode of the payment.
    pub mode: PaymentMode,
    /// Money value applied to the balance.
    pub amount_applied: Decimal,
    /// Invoice `paid_amount` after this payment.
    pub new_paid_amount: Decimal,
    /// Invoice `balance_due` after this payment.
    pub new_balance_due: Decimal,
    /// Invoice payment status after this payment.
    pub new_payment_status: PaymentStatus,
    /// Money ledger transaction to append.
    pub transaction: TransactionDraft,
    /// Gold ledger entry to append, gold exchange only.
    pub gold_entry: Option<GoldEntryDraft>,
    /// Gold settlement figures, gold exchange only.
    pub gold_settlement: Option<GoldSettlement>,
}
