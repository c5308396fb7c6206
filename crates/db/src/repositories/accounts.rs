//! Account registry repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

use karat_shared::types::{PageRequest, round_money};

use crate::entities::accounts;

use super::StoreError;

/// Thin registry for money accounts. Balances are only ever changed by the
/// money ledger, never through this repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with an opening balance.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is blank or the insert fails.
    pub async fn create(
        &self,
        name: &str,
        opening_balance: Decimal,
    ) -> Result<accounts::Model, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("account name is required".into()));
        }

        let now = Utc::now().into();
        let opening = round_money(opening_balance);
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            opening_balance: Set(opening),
            current_balance: Set(opening),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = account.insert(&self.db).await?;
        Ok(model)
    }

    /// Gets an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the account does not exist.
    pub async fn get(&self, id: Uuid) -> Result<accounts::Model, StoreError> {
        accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "account",
                id: id.to_string(),
            })
    }

    /// Lists accounts by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<accounts::Model>, u64), StoreError> {
        let total = accounts::Entity::find().count(&self.db).await?;
        let items = accounts::Entity::find()
            .order_by_asc(accounts::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((items, total))
    }
}
