//! `SeaORM` Entity for the audit_log table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An append-only audit entry, written in the same database transaction as
/// the mutation it records.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    /// Entry ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Module the record belongs to, e.g. `invoice`.
    pub module: String,
    /// The record's ID.
    pub record_id: Uuid,
    /// What happened, e.g. `finalize`, `admin_override_edit`.
    pub action: String,
    /// Who did it.
    pub actor_id: Uuid,
    /// Display name of who did it.
    pub actor_name: String,
    /// Structured details of the change.
    pub changes: Json,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
