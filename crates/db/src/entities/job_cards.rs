//! `SeaORM` Entity for the job_cards table.
//!
//! Job cards are produced elsewhere; this engine locks them when a linked
//! invoice finalizes and enforces the override policy on later mutation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A job card consumed and locked by this engine.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_cards")]
pub struct Model {
    /// Job card ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-readable number, e.g. `JC-0015`.
    #[sea_orm(unique)]
    pub job_card_number: String,
    /// Customer the work is for.
    pub customer_name: String,
    /// Saved party, if the customer is one.
    pub party_id: Option<Uuid>,
    /// Workflow status; flips to `invoiced` when a linked invoice finalizes.
    pub status: String,
    /// Whether the card is locked.
    pub locked: bool,
    /// When the lock was set.
    pub locked_at: Option<DateTimeWithTimeZone>,
    /// Display name of whoever finalized the locking invoice.
    pub locked_by: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
