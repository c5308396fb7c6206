//! Money ledger repository.
//!
//! Transactions are append-only and numbered `TXN-YYYY-NNNN`, monotonic per
//! year. Account balances are materialized: debits draw an account down,
//! credits top it up, applied in the same database transaction as the
//! append.

use chrono::Datelike;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use karat_core::ledger::{TransactionDraft, TransactionType};
use karat_shared::types::{PageRequest, round_money};

use crate::entities::{accounts, transactions};

use super::StoreError;

/// Read access to the append-only money ledger.
#[derive(Debug, Clone)]
pub struct MoneyLedgerRepository {
    db: DatabaseConnection,
}

impl MoneyLedgerRepository {
    /// Creates a new money ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), StoreError> {
        let total = transactions::Entity::find().count(&self.db).await?;
        let items = transactions::Entity::find()
            .order_by_desc(transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((items, total))
    }

    /// Lists a party's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_party(
        &self,
        party_id: Uuid,
    ) -> Result<Vec<transactions::Model>, StoreError> {
        let items = transactions::Entity::find()
            .filter(transactions::Column::PartyId.eq(party_id))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(items)
    }
}

/// Allocates the next `TXN-YYYY-NNNN` number for the given year.
///
/// Must run inside the same transaction as the insert that uses it so
/// concurrent appends cannot allocate the same number.
pub(crate) async fn next_transaction_number<C: ConnectionTrait>(
    conn: &C,
    year: i32,
) -> Result<String, StoreError> {
    let prefix = format!("TXN-{year}-");
    let latest = transactions::Entity::find()
        .filter(transactions::Column::TransactionNumber.starts_with(&prefix))
        .order_by_desc(transactions::Column::TransactionNumber)
        .one(conn)
        .await?;

    let next = latest
        .and_then(|t| t.transaction_number[prefix.len()..].parse::<u32>().ok())
        .unwrap_or(0)
        + 1;
    Ok(format!("{prefix}{next:04}"))
}

/// Appends a money ledger transaction and updates the account's
/// materialized balance inside the caller's transaction.
///
/// Returns the new row's ID and its transaction number.
pub(crate) async fn append<C: ConnectionTrait>(
    conn: &C,
    draft: &TransactionDraft,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<(Uuid, String), StoreError> {
    let id = Uuid::new_v4();
    let number = next_transaction_number(conn, at.year()).await?;
    let amount = round_money(draft.amount);

    let row = transactions::ActiveModel {
        id: Set(id),
        transaction_number: Set(number.clone()),
        transaction_type: Set(draft.transaction_type.as_str().to_string()),
        amount: Set(amount),
        account_id: Set(draft.account_id),
        party_id: Set(draft.party_id),
        category: Set(draft.category.clone()),
        payment_mode: Set(draft.payment_mode.map(|mode| mode.as_str().to_string())),
        reference_type: Set(Some(draft.reference.reference_type.as_str().to_string())),
        reference_id: Set(Some(draft.reference.reference_id)),
        created_at: Set(at),
    };
    row.insert(conn).await?;

    if let Some(account_id) = draft.account_id {
        let delta = match draft.transaction_type {
            TransactionType::Debit => -amount,
            TransactionType::Credit => amount,
        };
        apply_account_delta(conn, account_id, delta, at).await?;
    }

    Ok((id, number))
}

/// Read-modify-writes an account's materialized balance.
pub(crate) async fn apply_account_delta<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    delta: Decimal,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<(), StoreError> {
    let account = accounts::Entity::find_by_id(account_id)
        .one(conn)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "account",
            id: account_id.to_string(),
        })?;

    let new_balance = round_money(account.current_balance + delta);
    let mut active: accounts::ActiveModel = account.into();
    active.current_balance = Set(new_balance);
    active.updated_at = Set(at);
    active.update(conn).await?;
    Ok(())
}
