//! Ledger entry draft types.
//!
//! A draft is a fully validated, not-yet-persisted ledger row. Once written
//! it is immutable; corrections happen through compensating entries, never
//! edits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use karat_shared::types::Purity;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Stock entering the shop (purchases).
    In,
    /// Stock leaving the shop (sales).
    Out,
}

impl MovementType {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Money ledger entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl TransactionType {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

/// Direction of a gold ledger entry, from the shop's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoldEntryType {
    /// Gold received from the party.
    In,
    /// Gold handed to the party.
    Out,
}

impl GoldEntryType {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Why gold changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldPurpose {
    /// Advance metal given to a vendor or worker.
    AdvanceGold,
    /// Old-gold exchange settling an invoice.
    Exchange,
    /// Metal issued for job work.
    JobWork,
    /// Metal received against a purchase.
    Purchase,
    /// Anything else.
    Other,
}

impl GoldPurpose {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdvanceGold => "advance_gold",
            Self::Exchange => "exchange",
            Self::JobWork => "job_work",
            Self::Purchase => "purchase",
            Self::Other => "other",
        }
    }
}

/// How an invoice payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Cash over the counter.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Card terminal.
    Card,
    /// Old-gold exchange.
    GoldExchange,
}

impl PaymentMode {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Card => "card",
            Self::GoldExchange => "gold_exchange",
        }
    }

    /// Returns true for modes settled in money against an account.
    #[must_use]
    pub const fn is_money_mode(self) -> bool {
        !matches!(self, Self::GoldExchange)
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "bank_transfer" => Ok(Self::BankTransfer),
            "card" => Ok(Self::Card),
            "gold_exchange" => Ok(Self::GoldExchange),
            _ => Err(format!("Unknown payment mode: {s}")),
        }
    }
}

/// Kind of document a ledger entry points back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    /// Sales invoice.
    Invoice,
    /// Vendor purchase.
    Purchase,
}

impl ReferenceType {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Purchase => "purchase",
        }
    }
}

/// Back-reference from a ledger entry to the document that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReference {
    /// The kind of causing document.
    pub reference_type: ReferenceType,
    /// The causing document's ID.
    pub reference_id: Uuid,
}

impl LedgerReference {
    /// Reference to an invoice.
    #[must_use]
    pub const fn invoice(id: Uuid) -> Self {
        Self {
            reference_type: ReferenceType::Invoice,
            reference_id: id,
        }
    }

    /// Reference to a purchase.
    #[must_use]
    pub const fn purchase(id: Uuid) -> Self {
        Self {
            reference_type: ReferenceType::Purchase,
            reference_id: id,
        }
    }
}

/// A stock movement awaiting persistence.
///
/// `category_id` may be absent: the movement is still recorded so the audit
/// trail stays complete even when the catalog has drifted, with
/// `category_name` carrying the best human-readable fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovementDraft {
    /// Matched catalog category, if any.
    pub category_id: Option<Uuid>,
    /// Resolved display name (catalog name, item category, description, or a
    /// generic placeholder, in that order).
    pub category_name: String,
    /// Movement direction.
    pub movement_type: MovementType,
    /// Signed piece-count delta (negative for outflow).
    pub qty_delta: Decimal,
    /// Signed weight delta in grams (negative for outflow).
    pub weight_delta: Decimal,
    /// Purity used for valuation.
    pub purity: Purity,
    /// Causing document.
    pub reference: LedgerReference,
}

/// A money ledger transaction awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    /// Account the money moved through, when one is involved.
    pub account_id: Option<Uuid>,
    /// Party the transaction concerns, when one is involved.
    pub party_id: Option<Uuid>,
    /// Debit or credit.
    pub transaction_type: TransactionType,
    /// Amount, 2 decimal places.
    pub amount: Decimal,
    /// Reporting category, e.g. "Sales Invoice".
    pub category: String,
    /// Payment mode, for payment transactions.
    pub payment_mode: Option<PaymentMode>,
    /// Causing document.
    pub reference: LedgerReference,
}

/// A gold ledger entry awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldEntryDraft {
    /// The party whose gold position changes.
    pub party_id: Uuid,
    /// IN or OUT from the shop's perspective.
    pub entry_type: GoldEntryType,
    /// Weight in grams, 3 decimal places.
    pub weight: Decimal,
    /// Purity of the metal.
    pub purity: Purity,
    /// Why the gold moved.
    pub purpose: GoldPurpose,
    /// Causing document.
    pub reference: LedgerReference,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_storage_strings() {
        assert_eq!(MovementType::In.as_str(), "in");
        assert_eq!(MovementType::Out.as_str(), "out");
        assert_eq!(TransactionType::Debit.as_str(), "debit");
        assert_eq!(TransactionType::Credit.as_str(), "credit");
        assert_eq!(GoldPurpose::AdvanceGold.as_str(), "advance_gold");
        assert_eq!(GoldPurpose::JobWork.as_str(), "job_work");
        assert_eq!(ReferenceType::Invoice.as_str(), "invoice");
    }

    #[test]
    fn test_payment_mode_parsing() {
        assert_eq!(PaymentMode::from_str("cash").unwrap(), PaymentMode::Cash);
        assert_eq!(
            PaymentMode::from_str("GOLD_EXCHANGE").unwrap(),
            PaymentMode::GoldExchange
        );
        assert_eq!(
            PaymentMode::from_str("bank_transfer").unwrap(),
            PaymentMode::BankTransfer
        );
        assert!(PaymentMode::from_str("cheque").is_err());
    }

    #[test]
    fn test_money_modes() {
        assert!(PaymentMode::Cash.is_money_mode());
        assert!(PaymentMode::BankTransfer.is_money_mode());
        assert!(PaymentMode::Card.is_money_mode());
        assert!(!PaymentMode::GoldExchange.is_money_mode());
    }

    #[test]
    fn test_reference_constructors() {
        let id = Uuid::new_v4();
        assert_eq!(
            LedgerReference::invoice(id).reference_type,
            ReferenceType::Invoice
        );
        assert_eq!(
            LedgerReference::purchase(id).reference_type,
            ReferenceType::Purchase
        );
    }
}
