//! `SeaORM` Entity for the purchase_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One line of a vendor purchase. `entered_purity` is the vendor's claim
/// and is informational only; valuation uses the shop's fixed purity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_items")]
pub struct Model {
    /// Line item ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning purchase.
    pub purchase_id: Uuid,
    /// Free-text description of the metal or piece.
    pub description: String,
    /// Catalog category name as entered.
    pub category_name: Option<String>,
    /// Piece count.
    pub qty: Decimal,
    /// Weight in grams, 3 decimal places.
    pub weight_grams: Decimal,
    /// Purity the vendor claims, per-mille.
    pub entered_purity: i32,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning purchase.
    #[sea_orm(
        belongs_to = "super::purchases::Entity",
        from = "Column::PurchaseId",
        to = "super::purchases::Column::Id"
    )]
    Purchases,
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
