//! `SeaORM` Entity for the inventory_categories table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stock category. Names are unique case- and whitespace-insensitively
/// via `normalized_name`. The `current_*` columns are materialized from the
/// stock movement ledger.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_categories")]
pub struct Model {
    /// Category ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display name as entered.
    pub name: String,
    /// Lowercased, whitespace-collapsed name used for uniqueness.
    #[sea_orm(unique)]
    pub normalized_name: String,
    /// Materialized piece count.
    pub current_qty: Decimal,
    /// Materialized weight in grams.
    pub current_weight: Decimal,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Stock movements recorded against this category.
    #[sea_orm(has_many = "super::stock_movements::Entity")]
    StockMovements,
}

impl Related<super::stock_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
