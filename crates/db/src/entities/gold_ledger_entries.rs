//! `SeaORM` Entity for the gold_ledger_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An append-only weight-based gold ledger entry. A party's gold position
/// is the net of IN minus OUT entries. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gold_ledger_entries")]
pub struct Model {
    /// Entry ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The party whose gold position changes.
    pub party_id: Uuid,
    /// `in` or `out`, from the shop's perspective.
    pub entry_type: String,
    /// Weight in grams, 3 decimal places.
    pub weight: Decimal,
    /// Purity of the metal, per-mille.
    pub purity: i32,
    /// `advance_gold`, `exchange`, `job_work`, `purchase`, or `other`.
    pub purpose: String,
    /// `invoice` or `purchase`.
    pub reference_type: String,
    /// The causing document's ID.
    pub reference_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
