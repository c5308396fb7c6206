//! Gold ledger repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use karat_core::ledger::{GoldEntryDraft, GoldEntryType};
use karat_shared::types::round_weight;

use crate::entities::gold_ledger_entries;

use super::StoreError;

/// Read access to the append-only gold ledger.
#[derive(Debug, Clone)]
pub struct GoldLedgerRepository {
    db: DatabaseConnection,
}

impl GoldLedgerRepository {
    /// Creates a new gold ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a party's gold ledger entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_party(
        &self,
        party_id: Uuid,
    ) -> Result<Vec<gold_ledger_entries::Model>, StoreError> {
        let entries = gold_ledger_entries::Entity::find()
            .filter(gold_ledger_entries::Column::PartyId.eq(party_id))
            .order_by_desc(gold_ledger_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(entries)
    }

    /// A party's net gold position (IN − OUT), 3 decimal places.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn net_balance(&self, party_id: Uuid) -> Result<Decimal, StoreError> {
        net_balance(&self.db, party_id).await
    }
}

/// Nets a party's gold ledger inside any connection or transaction.
pub(crate) async fn net_balance<C: ConnectionTrait>(
    conn: &C,
    party_id: Uuid,
) -> Result<Decimal, StoreError> {
    let entries = gold_ledger_entries::Entity::find()
        .filter(gold_ledger_entries::Column::PartyId.eq(party_id))
        .all(conn)
        .await?;

    let mut net = Decimal::ZERO;
    for entry in entries {
        match entry.entry_type.as_str() {
            "in" => net += entry.weight,
            "out" => net -= entry.weight,
            other => {
                return Err(StoreError::Internal(format!(
                    "unknown gold entry type in storage: {other}"
                )));
            }
        }
    }
    Ok(round_weight(net))
}

/// Appends a gold ledger entry inside the caller's transaction.
pub(crate) async fn append<C: ConnectionTrait>(
    conn: &C,
    draft: &GoldEntryDraft,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<Uuid, StoreError> {
    let id = Uuid::new_v4();
    let entry = gold_ledger_entries::ActiveModel {
        id: Set(id),
        party_id: Set(draft.party_id),
        entry_type: Set(draft.entry_type.as_str().to_string()),
        weight: Set(round_weight(draft.weight)),
        purity: Set(i32::from(draft.purity.per_mille())),
        purpose: Set(draft.purpose.as_str().to_string()),
        reference_type: Set(draft.reference.reference_type.as_str().to_string()),
        reference_id: Set(draft.reference.reference_id),
        created_at: Set(at),
    };
    entry.insert(conn).await?;
    Ok(id)
}

/// Converts a stored entry type back to the domain enum.
pub(crate) fn entry_type_from_db(stored: &str) -> Result<GoldEntryType, StoreError> {
    match stored {
        "in" => Ok(GoldEntryType::In),
        "out" => Ok(GoldEntryType::Out),
        other => Err(StoreError::Internal(format!(
            "unknown gold entry type in storage: {other}"
        ))),
    }
}
