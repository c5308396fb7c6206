//! Shared harness for repository integration tests.
//!
//! Each test gets its own throwaway SQLite database file with the full
//! migration set applied, so tests run in parallel without sharing state.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use karat_core::party::PartyType;
use karat_db::entities::{gold_ledger_entries, job_cards};
use karat_db::migration::Migrator;
use karat_db::repositories::invoices::{CreateInvoiceInput, InvoiceWithItems, LineItemInput};
use karat_db::repositories::purchases::{CreatePurchaseInput, PurchaseItemInput, PurchaseWithItems};
use karat_db::{
    AccountRepository, InventoryRepository, InvoiceRepository, PartyRepository, PurchaseRepository,
};
use karat_shared::types::Purity;
use karat_shared::{Caller, Role};
use sea_orm_migration::MigratorTrait;

/// Connects to a fresh throwaway SQLite database with migrations applied.
pub async fn test_db() -> DatabaseConnection {
    let path = std::env::temp_dir().join(format!("karat-test-{}.db", Uuid::new_v4()));
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let db = Database::connect(&url).await.expect("connect test database");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// The shop's fixed valuation purity used throughout the tests.
pub fn valuation() -> Purity {
    Purity::new(916).unwrap()
}

/// An admin caller.
pub fn admin() -> Caller {
    Caller::new(Uuid::new_v4(), "Meera", Role::Admin)
}

/// A staff caller without override capability.
pub fn staff() -> Caller {
    Caller::new(Uuid::new_v4(), "Asha", Role::Staff)
}

/// Today's date, as the documents see it.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Creates a party through the repository.
pub async fn seed_party(db: &DatabaseConnection, name: &str, party_type: PartyType) -> Uuid {
    let repo = PartyRepository::new(db.clone());
    repo.create(karat_db::repositories::parties::CreatePartyInput {
        name: name.to_string(),
        party_type,
        phone: None,
        address: None,
    })
    .await
    .expect("seed party")
    .id
}

/// Creates an account through the repository.
pub async fn seed_account(db: &DatabaseConnection, name: &str, opening: Decimal) -> Uuid {
    let repo = AccountRepository::new(db.clone());
    repo.create(name, opening).await.expect("seed account").id
}

/// Creates an inventory category through the repository.
pub async fn seed_category(db: &DatabaseConnection, name: &str) -> Uuid {
    let repo = InventoryRepository::new(db.clone());
    repo.create_category(name).await.expect("seed category").id
}

/// Inserts a job card directly; card production is outside the engine.
pub async fn seed_job_card(db: &DatabaseConnection, number: &str, customer: &str) -> Uuid {
    let now = Utc::now().into();
    let id = Uuid::new_v4();
    let card = job_cards::ActiveModel {
        id: Set(id),
        job_card_number: Set(number.to_string()),
        customer_name: Set(customer.to_string()),
        party_id: Set(None),
        status: Set("in_progress".to_string()),
        locked: Set(false),
        locked_at: Set(None),
        locked_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    card.insert(db).await.expect("seed job card");
    id
}

/// Inserts a gold ledger IN entry directly, giving the party a balance.
pub async fn seed_gold_in(db: &DatabaseConnection, party_id: Uuid, weight: Decimal) {
    let entry = gold_ledger_entries::ActiveModel {
        id: Set(Uuid::new_v4()),
        party_id: Set(party_id),
        entry_type: Set("in".to_string()),
        weight: Set(weight),
        purity: Set(916),
        purpose: Set("other".to_string()),
        reference_type: Set("purchase".to_string()),
        reference_id: Set(Uuid::new_v4()),
        created_at: Set(Utc::now().into()),
    };
    entry.insert(db).await.expect("seed gold entry");
}

/// A standard 20.000 g line at 50.00/g with a 100.00 making charge.
pub fn standard_line(category: Option<&str>) -> LineItemInput {
    LineItemInput {
        description: "22k bangle".to_string(),
        category_name: category.map(ToString::to_string),
        qty: dec!(1),
        weight: dec!(20.000),
        purity: 916,
        rate_per_gram: dec!(50.00),
        making_charge: dec!(100.00),
    }
}

/// Creates a draft invoice through the repository.
pub async fn draft_invoice(
    db: &DatabaseConnection,
    party_id: Option<Uuid>,
    walk_in_name: Option<&str>,
    job_card_id: Option<Uuid>,
    lines: Vec<LineItemInput>,
    invoice_date: NaiveDate,
) -> InvoiceWithItems {
    let repo = InvoiceRepository::new(db.clone());
    repo.create(CreateInvoiceInput {
        party_id,
        walk_in_name: walk_in_name.map(ToString::to_string),
        job_card_id,
        invoice_date,
        vat_rate: dec!(5),
        lines,
    })
    .await
    .expect("create draft invoice")
}

/// Creates a draft purchase through the repository.
pub async fn draft_purchase(
    db: &DatabaseConnection,
    vendor_id: Uuid,
    category: Option<&str>,
    weight: Decimal,
    entered_purity: u16,
    total: Decimal,
    paid: Decimal,
    account_id: Option<Uuid>,
) -> PurchaseWithItems {
    let repo = PurchaseRepository::new(db.clone());
    repo.create(CreatePurchaseInput {
        vendor_id,
        purchase_date: today(),
        items: vec![PurchaseItemInput {
            description: "old gold".to_string(),
            category_name: category.map(ToString::to_string),
            qty: dec!(1),
            weight_grams: weight,
            entered_purity,
        }],
        total_amount: total,
        paid_amount: paid,
        paid_from_account_id: account_id,
        advance_gold_weight: None,
        advance_gold_purity: None,
        exchange_gold_weight: None,
        exchange_gold_purity: None,
        notes: None,
    })
    .await
    .expect("create draft purchase")
}
