//! Audit log repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use karat_core::audit::{AuditDraft, AuditModule};
use karat_shared::Caller;

use crate::entities::audit_log;

use super::StoreError;

/// Read access to the append-only audit log.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists audit entries for one record, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_record(
        &self,
        module: AuditModule,
        record_id: Uuid,
    ) -> Result<Vec<audit_log::Model>, StoreError> {
        let entries = audit_log::Entity::find()
            .filter(audit_log::Column::Module.eq(module.as_str()))
            .filter(audit_log::Column::RecordId.eq(record_id))
            .order_by_desc(audit_log::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(entries)
    }
}

/// Appends an audit entry inside the caller's transaction.
pub(crate) async fn append<C: ConnectionTrait>(
    conn: &C,
    draft: &AuditDraft,
    caller: &Caller,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<Uuid, StoreError> {
    let id = Uuid::new_v4();
    let entry = audit_log::ActiveModel {
        id: Set(id),
        module: Set(draft.module.as_str().to_string()),
        record_id: Set(draft.record_id),
        action: Set(draft.action.as_str().to_string()),
        actor_id: Set(caller.id),
        actor_name: Set(caller.name.clone()),
        changes: Set(draft.changes.clone()),
        created_at: Set(at),
    };
    entry.insert(conn).await?;
    Ok(id)
}
