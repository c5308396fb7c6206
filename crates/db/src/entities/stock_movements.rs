//! `SeaORM` Entity for the stock_movements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An append-only stock movement. `category_id` may be null when the
/// catalog had no match at finalize time; the movement is recorded anyway
/// with a human-readable `category_name` fallback. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    /// Movement ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Matched catalog category, if any.
    pub category_id: Option<Uuid>,
    /// Resolved display name.
    pub category_name: String,
    /// `in` or `out`.
    pub movement_type: String,
    /// Signed piece-count delta (negative for outflow).
    pub qty_delta: Decimal,
    /// Signed weight delta in grams (negative for outflow).
    pub weight_delta: Decimal,
    /// Purity used for valuation, per-mille.
    pub purity: i32,
    /// `invoice` or `purchase`.
    pub reference_type: String,
    /// The causing document's ID.
    pub reference_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The matched category, when one exists.
    #[sea_orm(
        belongs_to = "super::inventory_categories::Entity",
        from = "Column::CategoryId",
        to = "super::inventory_categories::Column::Id"
    )]
    InventoryCategories,
}

impl Related<super::inventory_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
