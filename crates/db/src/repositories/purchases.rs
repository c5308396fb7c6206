//! Purchase repository: draft CRUD under the lock and override policy.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use karat_core::audit::{AuditAction, AuditDraft, AuditModule, override_changes};
use karat_core::document::{DocumentStatus, PurchaseDoc, PurchaseItem};
use karat_core::lock::{LockState, MutationKind, OverrideWarning, check_mutation};
use karat_shared::Caller;
use karat_shared::types::{PageRequest, Purity, round_money, round_weight};

use crate::entities::{accounts, parties, purchase_items, purchases};

use super::{StoreError, audit, purity_from_db};

/// Input for one purchase line.
#[derive(Debug, Clone)]
pub struct PurchaseItemInput {
    /// Free-text description of the metal or piece.
    pub description: String,
    /// Catalog category name.
    pub category_name: Option<String>,
    /// Piece count, must be positive.
    pub qty: Decimal,
    /// Weight in grams, must be positive.
    pub weight_grams: Decimal,
    /// Purity the vendor claims, per-mille.
    pub entered_purity: u16,
}

/// Input for creating a draft purchase.
#[derive(Debug, Clone)]
pub struct CreatePurchaseInput {
    /// The vendor.
    pub vendor_id: Uuid,
    /// Document date.
    pub purchase_date: NaiveDate,
    /// Line items.
    pub items: Vec<PurchaseItemInput>,
    /// Agreed total.
    pub total_amount: Decimal,
    /// Money paid up front.
    pub paid_amount: Decimal,
    /// Account the paid portion was drawn from.
    pub paid_from_account_id: Option<Uuid>,
    /// Advance gold handed to the vendor, grams.
    pub advance_gold_weight: Option<Decimal>,
    /// Purity of the advance gold, per-mille.
    pub advance_gold_purity: Option<u16>,
    /// Gold received from the vendor in exchange, grams.
    pub exchange_gold_weight: Option<Decimal>,
    /// Purity of the exchanged gold, per-mille.
    pub exchange_gold_purity: Option<u16>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Input for editing a purchase.
///
/// Drafts accept every field; finalized purchases accept only `notes`, and
/// only under admin override.
#[derive(Debug, Clone, Default)]
pub struct UpdatePurchaseInput {
    /// New document date.
    pub purchase_date: Option<NaiveDate>,
    /// Replacement line items.
    pub items: Option<Vec<PurchaseItemInput>>,
    /// New agreed total.
    pub total_amount: Option<Decimal>,
    /// New paid amount.
    pub paid_amount: Option<Decimal>,
    /// New paying account.
    pub paid_from_account_id: Option<Uuid>,
    /// New notes.
    pub notes: Option<String>,
}

/// A purchase with its line items.
#[derive(Debug, Clone)]
pub struct PurchaseWithItems {
    /// Purchase header.
    pub purchase: purchases::Model,
    /// Line items.
    pub items: Vec<purchase_items::Model>,
}

/// Purchase repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft purchase.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for malformed input, `NotFound` for unknown
    /// references.
    pub async fn create(
        &self,
        input: CreatePurchaseInput,
    ) -> Result<PurchaseWithItems, StoreError> {
        let vendor = parties::Entity::find_by_id(input.vendor_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "party",
                id: input.vendor_id.to_string(),
            })?;
        if vendor.party_type != "vendor" {
            return Err(StoreError::Validation(format!(
                "party \"{}\" is not a vendor",
                vendor.name
            )));
        }

        if input.total_amount < Decimal::ZERO || input.paid_amount < Decimal::ZERO {
            return Err(StoreError::Validation(
                "amounts cannot be negative".into(),
            ));
        }
        if input.paid_amount > input.total_amount {
            return Err(StoreError::Validation(format!(
                "paid amount {} exceeds total {}",
                input.paid_amount, input.total_amount
            )));
        }
        if input.paid_amount > Decimal::ZERO {
            let account_id = input.paid_from_account_id.ok_or_else(|| {
                StoreError::Validation("paid_from_account_id is required when paying".into())
            })?;
            accounts::Entity::find_by_id(account_id)
                .one(&self.db)
                .await?
                .ok_or(StoreError::NotFound {
                    entity: "account",
                    id: account_id.to_string(),
                })?;
        }
        validate_items(&input.items)?;
        validate_gold_field(input.advance_gold_weight, input.advance_gold_purity)?;
        validate_gold_field(input.exchange_gold_weight, input.exchange_gold_purity)?;

        let total = round_money(input.total_amount);
        let paid = round_money(input.paid_amount);
        let balance = round_money(total - paid);

        let now = Utc::now();
        let at = now.into();
        let txn = self.db.begin().await?;

        let purchase_number = next_purchase_number(&txn, now.year()).await?;
        let purchase_id = Uuid::new_v4();
        let purchase = purchases::ActiveModel {
            id: Set(purchase_id),
            purchase_number: Set(purchase_number.clone()),
            vendor_id: Set(input.vendor_id),
            status: Set(DocumentStatus::Draft.as_str().to_string()),
            purchase_date: Set(input.purchase_date),
            total_amount: Set(total),
            paid_amount: Set(paid),
            balance_due: Set(balance),
            paid_from_account_id: Set(input.paid_from_account_id),
            advance_gold_weight: Set(input.advance_gold_weight.map(round_weight)),
            advance_gold_purity: Set(input.advance_gold_purity.map(i32::from)),
            exchange_gold_weight: Set(input.exchange_gold_weight.map(round_weight)),
            exchange_gold_purity: Set(input.exchange_gold_purity.map(i32::from)),
            notes: Set(input.notes),
            locked: Set(false),
            locked_at: Set(None),
            locked_by: Set(None),
            finalized_at: Set(None),
            finalized_by: Set(None),
            finalized_by_name: Set(None),
            created_at: Set(at),
            updated_at: Set(at),
        };
        let purchase = purchase.insert(&txn).await?;
        let items = insert_items(&txn, purchase_id, &input.items, at).await?;

        txn.commit().await?;
        info!(purchase_number = %purchase_number, "created draft purchase");

        Ok(PurchaseWithItems { purchase, items })
    }

    /// Gets a purchase with its items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the purchase does not exist.
    pub async fn get(&self, id: Uuid) -> Result<PurchaseWithItems, StoreError> {
        let (purchase, items) = load(&self.db, id).await?;
        Ok(PurchaseWithItems { purchase, items })
    }

    /// Lists purchases, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        status: Option<DocumentStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<purchases::Model>, u64), StoreError> {
        let mut query = purchases::Entity::find();
        if let Some(status) = status {
            query = query.filter(purchases::Column::Status.eq(status.as_str()));
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(purchases::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((items, total))
    }

    /// Edits a purchase under the lock policy.
    ///
    /// # Errors
    ///
    /// Returns `Policy` when the caller cannot override the lock,
    /// `Validation` for fields that cannot change after finalize.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdatePurchaseInput,
        caller: &Caller,
        reason: Option<&str>,
    ) -> Result<(PurchaseWithItems, Option<OverrideWarning>), StoreError> {
        let (purchase, _) = load(&self.db, id).await?;
        let label = format!("Purchase {}", purchase.purchase_number);
        let source = format!("purchase {}", purchase.purchase_number);

        let warning = check_mutation(
            &lock_state(&purchase),
            MutationKind::Edit,
            caller,
            &label,
            &source,
        )?;

        let at = Utc::now().into();
        let txn = self.db.begin().await?;

        let updated = if warning.is_some() {
            let reason = reason.ok_or_else(|| {
                StoreError::Validation("override reason is required".into())
            })?;
            if input.items.is_some()
                || input.total_amount.is_some()
                || input.paid_amount.is_some()
                || input.paid_from_account_id.is_some()
                || input.purchase_date.is_some()
            {
                return Err(StoreError::Validation(
                    "line items and amounts cannot change after finalize; only notes".into(),
                ));
            }
            let new_notes = input.notes.clone().ok_or_else(|| {
                StoreError::Validation("nothing to change: notes is required".into())
            })?;

            let payload = override_changes(
                reason,
                purchase.finalized_at.map(Into::into),
                purchase.finalized_by_name.as_deref(),
                json!({ "notes": { "from": purchase.notes, "to": new_notes } }),
            );
            audit::append(
                &txn,
                &AuditDraft::new(
                    AuditModule::Purchase,
                    purchase.id,
                    AuditAction::AdminOverrideEdit,
                    payload,
                ),
                caller,
                at,
            )
            .await?;

            let mut active: purchases::ActiveModel = purchase.into();
            active.notes = Set(Some(new_notes));
            active.updated_at = Set(at);
            active.update(&txn).await?
        } else {
            apply_draft_update(&txn, purchase, input, caller, at).await?
        };

        let items = purchase_items::Entity::find()
            .filter(purchase_items::Column::PurchaseId.eq(id))
            .all(&txn)
            .await?;
        txn.commit().await?;

        Ok((
            PurchaseWithItems {
                purchase: updated,
                items,
            },
            warning,
        ))
    }

    /// Deletes a purchase under the lock policy.
    ///
    /// # Errors
    ///
    /// Returns `Policy` when the caller cannot override the lock.
    pub async fn delete(
        &self,
        id: Uuid,
        caller: &Caller,
        reason: Option<&str>,
    ) -> Result<Option<OverrideWarning>, StoreError> {
        let (purchase, _) = load(&self.db, id).await?;
        let label = format!("Purchase {}", purchase.purchase_number);
        let source = format!("purchase {}", purchase.purchase_number);

        let warning = check_mutation(
            &lock_state(&purchase),
            MutationKind::Delete,
            caller,
            &label,
            &source,
        )?;

        let at = Utc::now().into();
        let txn = self.db.begin().await?;

        let (action, payload) = if warning.is_some() {
            let reason = reason.ok_or_else(|| {
                StoreError::Validation("override reason is required".into())
            })?;
            (
                AuditAction::AdminOverrideDelete,
                override_changes(
                    reason,
                    purchase.finalized_at.map(Into::into),
                    purchase.finalized_by_name.as_deref(),
                    json!({
                        "purchase_number": purchase.purchase_number,
                        "total_amount": purchase.total_amount.to_string(),
                    }),
                ),
            )
        } else {
            (
                AuditAction::Delete,
                json!({ "purchase_number": purchase.purchase_number }),
            )
        };

        audit::append(
            &txn,
            &AuditDraft::new(AuditModule::Purchase, purchase.id, action, payload),
            caller,
            at,
        )
        .await?;

        purchase_items::Entity::delete_many()
            .filter(purchase_items::Column::PurchaseId.eq(id))
            .exec(&txn)
            .await?;
        purchases::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(warning)
    }
}

/// The lock state a purchase presents to the override policy.
///
/// Finalized purchases are immutable like invoices; the `locked` column
/// additionally flags full settlement.
pub(crate) fn lock_state(purchase: &purchases::Model) -> LockState {
    if purchase.status == DocumentStatus::Finalized.as_str() {
        LockState {
            locked: true,
            locked_at: purchase.finalized_at.map(Into::into),
            locked_by: purchase.finalized_by_name.clone(),
        }
    } else {
        LockState::unlocked()
    }
}

/// Loads a purchase and its items.
pub(crate) async fn load<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<(purchases::Model, Vec<purchase_items::Model>), StoreError> {
    let purchase = purchases::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "purchase",
            id: id.to_string(),
        })?;
    let items = purchase_items::Entity::find()
        .filter(purchase_items::Column::PurchaseId.eq(id))
        .order_by_asc(purchase_items::Column::CreatedAt)
        .all(conn)
        .await?;
    Ok((purchase, items))
}

/// Loads a purchase as the planners' document view.
pub(crate) async fn load_doc<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<(purchases::Model, PurchaseDoc), StoreError> {
    let (purchase, items) = load(conn, id).await?;

    let status = DocumentStatus::from_str(&purchase.status).map_err(StoreError::Internal)?;
    let core_items = items
        .iter()
        .map(|item| {
            Ok(PurchaseItem {
                description: item.description.clone(),
                category_name: item.category_name.clone(),
                qty: item.qty,
                weight_grams: item.weight_grams,
                entered_purity: purity_from_db(item.entered_purity)?,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    let advance_gold_purity = purchase
        .advance_gold_purity
        .map(purity_from_db)
        .transpose()?;
    let exchange_gold_purity = purchase
        .exchange_gold_purity
        .map(purity_from_db)
        .transpose()?;

    let doc = PurchaseDoc {
        id: purchase.id,
        purchase_number: purchase.purchase_number.clone(),
        vendor_id: purchase.vendor_id,
        status,
        purchase_date: purchase.purchase_date,
        items: core_items,
        total_amount: purchase.total_amount,
        paid_amount: purchase.paid_amount,
        balance_due: purchase.balance_due,
        paid_from_account_id: purchase.paid_from_account_id,
        advance_gold_weight: purchase.advance_gold_weight,
        advance_gold_purity,
        exchange_gold_weight: purchase.exchange_gold_weight,
        exchange_gold_purity,
    };
    Ok((purchase, doc))
}

fn validate_items(inputs: &[PurchaseItemInput]) -> Result<(), StoreError> {
    for input in inputs {
        if input.qty <= Decimal::ZERO {
            return Err(StoreError::Validation(format!(
                "item quantity must be positive, got {}",
                input.qty
            )));
        }
        if input.weight_grams <= Decimal::ZERO {
            return Err(StoreError::Validation(format!(
                "item weight must be positive, got {}",
                input.weight_grams
            )));
        }
        Purity::new(input.entered_purity).map_err(StoreError::Validation)?;
    }
    Ok(())
}

fn validate_gold_field(weight: Option<Decimal>, purity: Option<u16>) -> Result<(), StoreError> {
    if let Some(weight) = weight {
        if weight <= Decimal::ZERO {
            return Err(StoreError::Validation(format!(
                "gold weight must be positive, got {weight}"
            )));
        }
    }
    if let Some(purity) = purity {
        Purity::new(purity).map_err(StoreError::Validation)?;
    }
    Ok(())
}

/// Allocates the next `PUR-YYYY-NNNN` number.
async fn next_purchase_number<C: ConnectionTrait>(
    conn: &C,
    year: i32,
) -> Result<String, StoreError> {
    let prefix = format!("PUR-{year}-");
    let latest = purchases::Entity::find()
        .filter(purchases::Column::PurchaseNumber.starts_with(&prefix))
        .order_by_desc(purchases::Column::PurchaseNumber)
        .one(conn)
        .await?;

    let next = latest
        .and_then(|purchase| purchase.purchase_number[prefix.len()..].parse::<u32>().ok())
        .unwrap_or(0)
        + 1;
    Ok(format!("{prefix}{next:04}"))
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    purchase_id: Uuid,
    inputs: &[PurchaseItemInput],
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<Vec<purchase_items::Model>, StoreError> {
    let mut items = Vec::with_capacity(inputs.len());
    for input in inputs {
        let item = purchase_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            purchase_id: Set(purchase_id),
            description: Set(input.description.trim().to_string()),
            category_name: Set(input.category_name.clone()),
            qty: Set(input.qty),
            weight_grams: Set(round_weight(input.weight_grams)),
            entered_purity: Set(i32::from(input.entered_purity)),
            created_at: Set(at),
        };
        items.push(item.insert(conn).await?);
    }
    Ok(items)
}

async fn apply_draft_update<C: ConnectionTrait>(
    txn: &C,
    purchase: purchases::Model,
    input: UpdatePurchaseInput,
    caller: &Caller,
    at: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<purchases::Model, StoreError> {
    let purchase_id = purchase.id;
    let current_total = purchase.total_amount;
    let current_paid = purchase.paid_amount;
    let mut changed_fields = Vec::new();

    if let Some(items) = &input.items {
        validate_items(items)?;
        purchase_items::Entity::delete_many()
            .filter(purchase_items::Column::PurchaseId.eq(purchase_id))
            .exec(txn)
            .await?;
        insert_items(txn, purchase_id, items, at).await?;
        changed_fields.push("items");
    }

    let total = input.total_amount.map(round_money).unwrap_or(current_total);
    let paid = input.paid_amount.map(round_money).unwrap_or(current_paid);
    if total < Decimal::ZERO || paid < Decimal::ZERO {
        return Err(StoreError::Validation("amounts cannot be negative".into()));
    }
    if paid > total {
        return Err(StoreError::Validation(format!(
            "paid amount {paid} exceeds total {total}"
        )));
    }

    let mut active: purchases::ActiveModel = purchase.into();
    if let Some(date) = input.purchase_date {
        active.purchase_date = Set(date);
        changed_fields.push("purchase_date");
    }
    if input.total_amount.is_some() {
        changed_fields.push("total_amount");
    }
    if input.paid_amount.is_some() {
        changed_fields.push("paid_amount");
    }
    if let Some(account_id) = input.paid_from_account_id {
        active.paid_from_account_id = Set(Some(account_id));
        changed_fields.push("paid_from_account_id");
    }
    if let Some(notes) = input.notes {
        active.notes = Set(Some(notes));
        changed_fields.push("notes");
    }
    active.total_amount = Set(total);
    active.paid_amount = Set(paid);
    active.balance_due = Set(round_money(total - paid));
    active.updated_at = Set(at);

    let updated = active.update(txn).await?;

    audit::append(
        txn,
        &AuditDraft::new(
            AuditModule::Purchase,
            purchase_id,
            AuditAction::Edit,
            json!({ "fields": changed_fields }),
        ),
        caller,
        at,
    )
    .await?;

    Ok(updated)
}
