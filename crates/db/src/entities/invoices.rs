//! `SeaORM` Entity for the invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A sales invoice. Mutable while `status = draft`; immutable after
/// finalize except for audited admin overrides.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Invoice ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-readable number, e.g. `INV-2026-0042`.
    #[sea_orm(unique)]
    pub invoice_number: String,
    /// Saved customer, if any.
    pub party_id: Option<Uuid>,
    /// Walk-in customer name when no saved party is referenced.
    pub walk_in_name: Option<String>,
    /// Linked job card, if the sale closes one.
    pub job_card_id: Option<Uuid>,
    /// `draft` or `finalized`.
    pub status: String,
    /// `unpaid`, `partial`, or `paid`.
    pub payment_status: String,
    /// Document date, drives aging.
    pub invoice_date: Date,
    /// VAT percentage applied.
    pub vat_rate: Decimal,
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
    /// When the invoice was finalized.
    pub finalized_at: Option<DateTimeWithTimeZone>,
    /// Who finalized it.
    pub finalized_by: Option<Uuid>,
    /// Display name of who finalized it.
    pub finalized_by_name: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Line items of this invoice.
    #[sea_orm(has_many = "super::invoice_items::Entity")]
    InvoiceItems,
}

impl Related<super::invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
