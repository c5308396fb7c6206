//! `SeaORM` Entity for the purchases table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A vendor purchase. Locks (`locked = true`) only once nothing remains
/// due; a partially paid purchase stays unlocked indefinitely.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Purchase ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-readable number, e.g. `PUR-2026-0007`.
    #[sea_orm(unique)]
    pub purchase_number: String,
    /// The vendor.
    pub vendor_id: Uuid,
    /// `draft` or `finalized`.
    pub status: String,
    /// Document date, drives aging.
    pub purchase_date: Date,
    /// Agreed total, 2 decimal places.
    pub total_amount: Decimal,
    /// Money already paid to the vendor.
    pub paid_amount: Decimal,
    /// `total_amount - paid_amount`.
    pub balance_due: Decimal,
    /// Account the paid portion was drawn from.
    pub paid_from_account_id: Option<Uuid>,
    /// Advance gold handed to the vendor, grams.
    pub advance_gold_weight: Option<Decimal>,
    /// Purity of the advance gold, per-mille.
    pub advance_gold_purity: Option<i32>,
    /// Gold received from the vendor in exchange, grams.
    pub exchange_gold_weight: Option<Decimal>,
    /// Purity of the exchanged gold, per-mille.
    pub exchange_gold_purity: Option<i32>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Whether the purchase is locked (fully paid).
    pub locked: bool,
    /// When the lock was set.
    pub locked_at: Option<DateTimeWithTimeZone>,
    /// Display name of whoever set the lock.
    pub locked_by: Option<String>,
    /// When the purchase was finalized.
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
    /// Line items of this purchase.
    #[sea_orm(has_many = "super::purchase_items::Entity")]
    PurchaseItems,
}

impl Related<super::purchase_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
