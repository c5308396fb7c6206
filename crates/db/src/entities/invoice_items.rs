//! `SeaORM` Entity for the invoice_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One line of a sales invoice.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    /// Line item ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning invoice.
    pub invoice_id: Uuid,
    /// Free-text description of the piece.
    pub description: String,
    /// Catalog category name as entered.
    pub category_name: Option<String>,
    /// Piece count.
    pub qty: Decimal,
    /// Weight in grams, 3 decimal places.
    pub weight: Decimal,
    /// Metal purity in per-mille fineness.
    pub purity: i32,
    /// Gold rate per gram, 2 decimal places.
    pub rate_per_gram: Decimal,
    /// Flat making charge, 2 decimal places.
    pub making_charge: Decimal,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning invoice.
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
