//! Party repository: registry plus the derived-balance projections.
//!
//! Balances are recomputed on every read from the ledgers and open
//! documents; nothing here caches them.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use karat_core::party::{
    OpenBalance, OutstandingReport, OutstandingRow, PartySummary, PartyType, aging_split,
    gold_position, money_position, summarize_outstanding,
};
use karat_shared::types::{PageRequest, PartyId, round_money};

use crate::entities::{gold_ledger_entries, invoices, parties, purchases, transactions};

use super::{StoreError, gold};

/// Input for creating a party.
#[derive(Debug, Clone)]
pub struct CreatePartyInput {
    /// Display name.
    pub name: String,
    /// `customer`, `vendor`, or `worker`.
    pub party_type: PartyType,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Party repository.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    db: DatabaseConnection,
}

impl PartyRepository {
    /// Creates a new party repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a party.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the name is blank.
    pub async fn create(&self, input: CreatePartyInput) -> Result<parties::Model, StoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("party name is required".into()));
        }

        let now = Utc::now().into();
        let party = parties::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            party_type: Set(input.party_type.as_str().to_string()),
            phone: Set(input.phone),
            address: Set(input.address),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = party.insert(&self.db).await?;
        Ok(model)
    }

    /// Gets a party by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the party does not exist.
    pub async fn get(&self, id: Uuid) -> Result<parties::Model, StoreError> {
        parties::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "party",
                id: id.to_string(),
            })
    }

    /// Lists parties by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, page: &PageRequest) -> Result<(Vec<parties::Model>, u64), StoreError> {
        let total = parties::Entity::find().count(&self.db).await?;
        let items = parties::Entity::find()
            .order_by_asc(parties::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((items, total))
    }

    /// Recomputes one party's gold and money positions.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the party does not exist.
    pub async fn summary(&self, id: Uuid) -> Result<PartySummary, StoreError> {
        self.get(id).await?;

        let gold_entries = gold_ledger_entries::Entity::find()
            .filter(gold_ledger_entries::Column::PartyId.eq(id))
            .all(&self.db)
            .await?;
        let typed: Vec<_> = gold_entries
            .iter()
            .map(|entry| {
                gold::entry_type_from_db(&entry.entry_type).map(|kind| (kind, entry.weight))
            })
            .collect::<Result<_, _>>()?;

        let open_invoices = self.open_invoices(Some(id)).await?;
        let open_purchases = self.open_purchases(Some(id)).await?;
        let credits = self.manual_credits(Some(id)).await?;

        let invoices_for_party = open_invoices.get(&id).cloned().unwrap_or_default();
        let purchases_for_party = open_purchases.get(&id).cloned().unwrap_or_default();
        let credits_for_party = credits.get(&id).copied().unwrap_or(Decimal::ZERO);

        Ok(PartySummary {
            party_id: PartyId::from_uuid(id),
            gold: gold_position(&typed),
            money: money_position(&invoices_for_party, &purchases_for_party, credits_for_party),
        })
    }

    /// Builds the outstanding report across all parties.
    ///
    /// Each party with any open balance contributes one row; receivables
    /// are bucketed by elapsed days since the document date.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn outstanding(&self, today: NaiveDate) -> Result<OutstandingReport, StoreError> {
        let open_invoices = self.open_invoices(None).await?;
        let open_purchases = self.open_purchases(None).await?;
        let credits = self.manual_credits(None).await?;

        let mut party_ids: Vec<Uuid> = open_invoices
            .keys()
            .chain(open_purchases.keys())
            .chain(credits.keys())
            .copied()
            .collect();
        party_ids.sort_unstable();
        party_ids.dedup();

        if party_ids.is_empty() {
            return Ok(OutstandingReport {
                parties: Vec::new(),
                summary: summarize_outstanding(&[]),
            });
        }

        let party_rows = parties::Entity::find()
            .filter(parties::Column::Id.is_in(party_ids.clone()))
            .all(&self.db)
            .await?;
        let party_map: HashMap<Uuid, parties::Model> =
            party_rows.into_iter().map(|row| (row.id, row)).collect();

        let mut rows = Vec::with_capacity(party_ids.len());
        for party_id in party_ids {
            let Some(party) = party_map.get(&party_id) else {
                continue;
            };
            let party_type =
                PartyType::from_str(&party.party_type).map_err(StoreError::Internal)?;

            let due_from = aging_split(
                open_invoices.get(&party_id).map_or(&[][..], Vec::as_slice),
                today,
            );
            let due_to_purchases: Decimal = open_purchases
                .get(&party_id)
                .map(|balances| balances.iter().map(|balance| balance.amount).sum())
                .unwrap_or(Decimal::ZERO);
            let due_to = round_money(
                due_to_purchases + credits.get(&party_id).copied().unwrap_or(Decimal::ZERO),
            );
            let net = round_money(due_from.total() - due_to);

            rows.push(OutstandingRow {
                party_id: PartyId::from_uuid(party_id),
                party_name: party.name.clone(),
                party_type,
                due_from,
                due_to,
                net,
            });
        }

        let summary = summarize_outstanding(&rows);
        Ok(OutstandingReport {
            parties: rows,
            summary,
        })
    }

    /// Open (finalized, balance due) invoice balances, grouped by party.
    async fn open_invoices(
        &self,
        party_id: Option<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<OpenBalance>>, StoreError> {
        let mut query = invoices::Entity::find()
            .filter(invoices::Column::Status.eq("finalized"))
            .filter(invoices::Column::BalanceDue.gt(Decimal::ZERO))
            .filter(invoices::Column::PartyId.is_not_null());
        if let Some(party_id) = party_id {
            query = query.filter(invoices::Column::PartyId.eq(party_id));
        }

        let rows = query.all(&self.db).await?;
        let mut grouped: HashMap<Uuid, Vec<OpenBalance>> = HashMap::new();
        for row in rows {
            if let Some(party) = row.party_id {
                grouped.entry(party).or_default().push(OpenBalance {
                    document_date: row.invoice_date,
                    amount: row.balance_due,
                });
            }
        }
        Ok(grouped)
    }

    /// Open (finalized, balance due) purchase balances, grouped by vendor.
    async fn open_purchases(
        &self,
        party_id: Option<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<OpenBalance>>, StoreError> {
        let mut query = purchases::Entity::find()
            .filter(purchases::Column::Status.eq("finalized"))
            .filter(purchases::Column::BalanceDue.gt(Decimal::ZERO));
        if let Some(party_id) = party_id {
            query = query.filter(purchases::Column::VendorId.eq(party_id));
        }

        let rows = query.all(&self.db).await?;
        let mut grouped: HashMap<Uuid, Vec<OpenBalance>> = HashMap::new();
        for row in rows {
            grouped.entry(row.vendor_id).or_default().push(OpenBalance {
                document_date: row.purchase_date,
                amount: row.balance_due,
            });
        }
        Ok(grouped)
    }

    /// Manual credit notes: credit transactions not caused by a document.
    ///
    /// Document-caused credits are already represented by the open balance
    /// of the document itself, so counting them here would double-book.
    async fn manual_credits(
        &self,
        party_id: Option<Uuid>,
    ) -> Result<HashMap<Uuid, Decimal>, StoreError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::TransactionType.eq("credit"))
            .filter(transactions::Column::PartyId.is_not_null())
            .filter(transactions::Column::ReferenceType.is_null());
        if let Some(party_id) = party_id {
            query = query.filter(transactions::Column::PartyId.eq(party_id));
        }

        let rows = query.all(&self.db).await?;
        let mut grouped: HashMap<Uuid, Decimal> = HashMap::new();
        for row in rows {
            if let Some(party) = row.party_id {
                *grouped.entry(party).or_insert(Decimal::ZERO) += row.amount;
            }
        }
        Ok(grouped)
    }
}
