//! Inventory repository: categories and the stock movement ledger.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use karat_core::finalize::CategoryRef;
use karat_core::ledger::StockMovementDraft;
use karat_shared::types::{PageRequest, round_weight};

use crate::entities::{inventory_categories, stock_movements};

use super::StoreError;

/// Normalizes a category name for uniqueness: lowercased, whitespace
/// collapsed.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Categories plus read access to the stock movement ledger.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category. Names are unique case- and
    /// whitespace-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name and `Conflict` for a duplicate.
    pub async fn create_category(
        &self,
        name: &str,
    ) -> Result<inventory_categories::Model, StoreError> {
        let display_name = name.trim();
        if display_name.is_empty() {
            return Err(StoreError::Validation("category name is required".into()));
        }
        let normalized = normalize_name(display_name);

        let existing = inventory_categories::Entity::find()
            .filter(inventory_categories::Column::NormalizedName.eq(&normalized))
            .one(&self.db)
            .await?;
        if let Some(existing) = existing {
            return Err(StoreError::Conflict(format!(
                "category \"{}\" already exists as \"{}\"",
                display_name, existing.name
            )));
        }

        let now = Utc::now().into();
        let category = inventory_categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(display_name.to_string()),
            normalized_name: Set(normalized),
            current_qty: Set(rust_decimal::Decimal::ZERO),
            current_weight: Set(rust_decimal::Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = category.insert(&self.db).await?;
        Ok(model)
    }

    /// Gets a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the category does not exist.
    pub async fn get_category(&self, id: Uuid) -> Result<inventory_categories::Model, StoreError> {
        inventory_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "inventory category",
                id: id.to_string(),
            })
    }

    /// Lists categories by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<inventory_categories::Model>, u64), StoreError> {
        let total = inventory_categories::Entity::find().count(&self.db).await?;
        let items = inventory_categories::Entity::find()
            .order_by_asc(inventory_categories::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((items, total))
    }

    /// Lists stock movements, newest first, optionally for one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_movements(
        &self,
        category_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<(Vec<stock_movements::Model>, u64), StoreError> {
        let mut query = stock_movements::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(stock_movements::Column::CategoryId.eq(category_id));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(stock_movements::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((items, total))
    }
}

/// Fetches the categories matching the given raw names, keyed by
/// normalized name.
pub(crate) async fn find_categories_by_names<C: ConnectionTrait>(
    conn: &C,
    names: &[String],
) -> Result<HashMap<String, CategoryRef>, StoreError> {
    let normalized: Vec<String> = names.iter().map(|name| normalize_name(name)).collect();
    if normalized.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = inventory_categories::Entity::find()
        .filter(inventory_categories::Column::NormalizedName.is_in(normalized))
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            (
                row.normalized_name.clone(),
                CategoryRef {
                    id: row.id,
                    name: row.name,
                },
            )
        })
        .collect())
}

/// Appends a stock movement and, when it matched a catalog category,
/// read-modify-writes that category's materialized totals. Runs inside the
/// caller's transaction.
pub(crate) async fn append_movement<C: ConnectionTrait>(
    conn: &C,
    draft: &StockMovementDraft,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<Uuid, StoreError> {
    let id = Uuid::new_v4();
    let movement = stock_movements::ActiveModel {
        id: Set(id),
        category_id: Set(draft.category_id),
        category_name: Set(draft.category_name.clone()),
        movement_type: Set(draft.movement_type.as_str().to_string()),
        qty_delta: Set(draft.qty_delta),
        weight_delta: Set(round_weight(draft.weight_delta)),
        purity: Set(i32::from(draft.purity.per_mille())),
        reference_type: Set(draft.reference.reference_type.as_str().to_string()),
        reference_id: Set(draft.reference.reference_id),
        created_at: Set(at),
    };
    movement.insert(conn).await?;

    if let Some(category_id) = draft.category_id {
        let category = inventory_categories::Entity::find_by_id(category_id)
            .one(conn)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "inventory category",
                id: category_id.to_string(),
            })?;

        let new_qty = category.current_qty + draft.qty_delta;
        let new_weight = round_weight(category.current_weight + draft.weight_delta);
        let mut active: inventory_categories::ActiveModel = category.into();
        active.current_qty = Set(new_qty);
        active.current_weight = Set(new_weight);
        active.updated_at = Set(at);
        active.update(conn).await?;
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_case_and_whitespace() {
        assert_eq!(normalize_name("Gold  Bangles"), "gold bangles");
        assert_eq!(normalize_name("  gold bangles  "), "gold bangles");
        assert_eq!(normalize_name("GOLD BANGLES"), "gold bangles");
        assert_eq!(normalize_name("Gold\tBangles"), "gold bangles");
    }
}
