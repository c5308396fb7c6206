//! Document domain types and status machines.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use karat_shared::types::Purity;

/// Document lifecycle status.
///
/// A draft is fully mutable. A finalized document is immutable except for
/// explicitly audited admin overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Document is being drafted and can be modified.
    Draft,
    /// Document has been committed to the ledgers (immutable).
    Finalized,
}

impl DocumentStatus {
    /// Returns true if the document can be modified freely.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the document is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Finalized)
    }

    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Finalized => "finalized",
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "finalized" => Ok(Self::Finalized),
            _ => Err(format!("Unknown document status: {s}")),
        }
    }
}

/// How much of a document's grand total has been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing received yet.
    Unpaid,
    /// Some money received, balance still due.
    Partial,
    /// Fully settled.
    Paid,
}

impl PaymentStatus {
    /// Derives the status from paid amount and remaining balance.
    #[must_use]
    pub fn from_amounts(paid_amount: Decimal, balance_due: Decimal) -> Self {
        if paid_amount.is_zero() {
            Self::Unpaid
        } else if balance_due <= Decimal::ZERO {
            Self::Paid
        } else {
            Self::Partial
        }
    }

    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Unknown payment status: {s}")),
        }
    }
}

/// One line of a sales invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Free-text description of the piece.
    pub description: String,
    /// Catalog category name as entered, if any.
    pub category_name: Option<String>,
    /// Piece count.
    pub qty: Decimal,
    /// Weight in grams, 3 decimal places.
    pub weight: Decimal,
    /// Metal purity of the piece.
    pub purity: Purity,
    /// Gold rate per gram for this purity, 2 decimal places.
    pub rate_per_gram: Decimal,
    /// Flat making charge, 2 decimal places.
    pub making_charge: Decimal,
}

/// A sales invoice as seen by the planners. Pure data, no behavior.
#[derive(Debug, Clone)]
pub struct InvoiceDoc {
    /// Invoice ID.
    pub id: Uuid,
    /// Human-readable number, e.g. `INV-2026-0042`.
    pub invoice_number: String,
    /// Saved customer, if any.
    pub party_id: Option<Uuid>,
    /// Walk-in customer name when no saved party is referenced.
    pub walk_in_name: Option<String>,
    /// Linked job card, if the sale closes one.
    pub job_card_id: Option<Uuid>,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Settlement status.
    pub payment_status: PaymentStatus,
    /// Document date, drives aging.
    pub invoice_date: NaiveDate,
    /// Line items.
    pub lines: Vec<LineItem>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// VAT on the subtotal.
    pub vat_amount: Decimal,
    /// Subtotal plus VAT.
    pub grand_total: Decimal,
    /// Money received so far.
    pub paid_amount: Decimal,
    /// `grand_total - paid_amount`.
    pub balance_due: Decimal,
}

/// One line of a vendor purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseItem {
    /// Free-text description of the metal or piece.
    pub description: String,
    /// Catalog category name as entered, if any.
    pub category_name: Option<String>,
    /// Piece count.
    pub qty: Decimal,
    /// Weight in grams, 3 decimal places.
    pub weight_grams: Decimal,
    /// Purity the vendor claims. Informational only; valuation always uses
    /// the shop's fixed valuation purity.
    pub entered_purity: Purity,
}

/// A vendor purchase as seen by the planners. Pure data, no behavior.
#[derive(Debug, Clone)]
pub struct PurchaseDoc {
    /// Purchase ID.
    pub id: Uuid,
    /// Human-readable number, e.g. `PUR-2026-0007`.
    pub purchase_number: String,
    /// The vendor.
    pub vendor_id: Uuid,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Document date, drives aging.
    pub purchase_date: NaiveDate,
    /// Line items.
    pub items: Vec<PurchaseItem>,
    /// Agreed total, 2 decimal places.
    pub total_amount: Decimal,
    /// Money already paid to the vendor.
    pub paid_amount: Decimal,
    /// `total_amount - paid_amount`.
    pub balance_due: Decimal,
    /// Account the paid portion was drawn from.
    pub paid_from_account_id: Option<Uuid>,
    /// Advance gold handed to the vendor, if any.
    pub advance_gold_weight: Option<Decimal>,
    /// Purity of the advance gold.
    pub advance_gold_purity: Option<Purity>,
    /// Gold received from the vendor in exchange, if any.
    pub exchange_gold_weight: Option<Decimal>,
    /// Purity of the exchanged gold.
    pub exchange_gold_purity: Option<Purity>,
}
