//! `SeaORM` Entity for the transactions table (money ledger).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An append-only money ledger entry. Debits draw an account down, credits
/// top it up; the account's materialized balance is updated in the same
/// database transaction as the append. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Transaction ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Monotonic human-readable number, e.g. `TXN-2026-0103`.
    #[sea_orm(unique)]
    pub transaction_number: String,
    /// `debit` or `credit`.
    pub transaction_type: String,
    /// Amount, 2 decimal places.
    pub amount: Decimal,
    /// Account the money moved through, when one is involved.
    pub account_id: Option<Uuid>,
    /// Party the transaction concerns, when one is involved.
    pub party_id: Option<Uuid>,
    /// Reporting category, e.g. "Sales Invoice".
    pub category: String,
    /// Payment mode, for payment transactions.
    pub payment_mode: Option<String>,
    /// `invoice` or `purchase`; null for manual journal entries.
    pub reference_type: Option<String>,
    /// The causing document's ID.
    pub reference_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
