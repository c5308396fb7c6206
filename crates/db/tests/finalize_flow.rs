//! End-to-end finalization tests over a real (SQLite) store.

mod common;

use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};

use common::{
    admin, draft_invoice, draft_purchase, seed_account, seed_category, seed_job_card, seed_party,
    standard_line, test_db, today, valuation,
};
use karat_core::party::PartyType;
use karat_db::entities::{
    gold_ledger_entries, inventory_categories, invoices, job_cards, stock_movements, transactions,
};
use karat_db::repositories::StoreError;
use karat_db::{FinalizeRepository, InvoiceRepository};

async fn ledger_counts(db: &sea_orm::DatabaseConnection) -> (u64, u64, u64) {
    let movements = stock_movements::Entity::find().count(db).await.unwrap();
    let txns = transactions::Entity::find().count(db).await.unwrap();
    let gold = gold_ledger_entries::Entity::find().count(db).await.unwrap();
    (movements, txns, gold)
}

#[tokio::test]
async fn draft_documents_touch_no_ledgers() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    seed_category(&db, "Gold Bangles").await;

    let invoice = draft_invoice(
        &db,
        Some(customer),
        None,
        None,
        vec![standard_line(Some("Gold Bangles"))],
        today(),
    )
    .await;

    assert_eq!(invoice.invoice.status, "draft");
    assert_eq!(invoice.invoice.grand_total, dec!(1155.00));
    assert_eq!(ledger_counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn finalize_invoice_writes_ledgers_atomically() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    let category_id = seed_category(&db, "Gold Bangles").await;

    let invoice = draft_invoice(
        &db,
        Some(customer),
        None,
        None,
        vec![standard_line(Some("Gold Bangles"))],
        today(),
    )
    .await;

    let repo = FinalizeRepository::new(db.clone(), valuation());
    let outcome = repo
        .finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize invoice");

    assert_eq!(outcome.document.status, "finalized");
    assert!(outcome.document.finalized_at.is_some());
    assert_eq!(outcome.document.finalized_by_name.as_deref(), Some("Meera"));
    assert_eq!(outcome.ledger.stock_movement_ids.len(), 1);
    assert_eq!(outcome.ledger.transaction_ids.len(), 1);
    assert!(outcome.ledger.audit_entry_id.is_some());

    let movement = stock_movements::Entity::find_by_id(outcome.ledger.stock_movement_ids[0])
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movement.movement_type, "out");
    assert_eq!(movement.qty_delta, dec!(-1));
    assert_eq!(movement.weight_delta, dec!(-20.000));
    assert_eq!(movement.category_id, Some(category_id));
    assert_eq!(movement.reference_type, "invoice");
    assert_eq!(movement.reference_id, invoice.invoice.id);

    let category = inventory_categories::Entity::find_by_id(category_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(category.current_weight, dec!(-20.000));
    assert_eq!(category.current_qty, dec!(-1));

    let txn = transactions::Entity::find_by_id(outcome.ledger.transaction_ids[0])
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(txn.transaction_type, "debit");
    assert_eq!(txn.amount, dec!(1155.00));
    assert_eq!(txn.party_id, Some(customer));
    assert_eq!(txn.category, "Sales Invoice");
    assert!(txn.transaction_number.starts_with("TXN-"));
}

#[tokio::test]
async fn second_finalize_fails_and_duplicates_nothing() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    seed_category(&db, "Gold Bangles").await;

    let invoice = draft_invoice(
        &db,
        Some(customer),
        None,
        None,
        vec![standard_line(Some("Gold Bangles"))],
        today(),
    )
    .await;

    let repo = FinalizeRepository::new(db.clone(), valuation());
    repo.finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("first finalize");
    let counts_after_first = ledger_counts(&db).await;

    let second = repo.finalize_invoice(invoice.invoice.id, &admin()).await;
    let err = second.expect_err("second finalize must fail");
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(err.to_string().contains("already finalized"));

    assert_eq!(ledger_counts(&db).await, counts_after_first);
}

#[tokio::test]
async fn unknown_category_still_moves_stock_with_fallback_name() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;

    let invoice = draft_invoice(
        &db,
        Some(customer),
        None,
        None,
        vec![standard_line(Some("Nose Pins"))],
        today(),
    )
    .await;

    let repo = FinalizeRepository::new(db.clone(), valuation());
    let outcome = repo
        .finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize invoice");

    let movement = stock_movements::Entity::find_by_id(outcome.ledger.stock_movement_ids[0])
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movement.category_id, None);
    assert_eq!(movement.category_name, "Nose Pins");
}

#[tokio::test]
async fn walk_in_invoice_skips_money_ledger() {
    let db = test_db().await;

    let invoice = draft_invoice(
        &db,
        None,
        Some("Walk-in"),
        None,
        vec![standard_line(None)],
        today(),
    )
    .await;

    let repo = FinalizeRepository::new(db.clone(), valuation());
    let outcome = repo
        .finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize walk-in invoice");

    assert!(outcome.ledger.transaction_ids.is_empty());
    assert_eq!(outcome.ledger.stock_movement_ids.len(), 1);
    let (_, txns, _) = ledger_counts(&db).await;
    assert_eq!(txns, 0);
}

#[tokio::test]
async fn finalize_locks_linked_job_card() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    let card_id = seed_job_card(&db, "JC-0015", "Ravi").await;

    let invoice = draft_invoice(
        &db,
        Some(customer),
        None,
        Some(card_id),
        vec![standard_line(None)],
        today(),
    )
    .await;

    let repo = FinalizeRepository::new(db.clone(), valuation());
    repo.finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize invoice");

    let card = job_cards::Entity::find_by_id(card_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(card.locked);
    assert_eq!(card.status, "invoiced");
    assert_eq!(card.locked_by.as_deref(), Some("Meera"));
    assert!(card.locked_at.is_some());
}

#[tokio::test]
async fn purchase_books_valuation_purity_and_stays_unlocked_when_unpaid() {
    let db = test_db().await;
    let vendor = seed_party(&db, "Bullion House", PartyType::Vendor).await;
    let category_id = seed_category(&db, "Raw Gold").await;

    // Vendor claims 999; the books must say 916.
    let purchase = draft_purchase(
        &db,
        vendor,
        Some("Raw Gold"),
        dec!(50.000),
        999,
        dec!(2500.00),
        dec!(0),
        None,
    )
    .await;

    let repo = FinalizeRepository::new(db.clone(), valuation());
    let outcome = repo
        .finalize_purchase(purchase.purchase.id, &admin())
        .await
        .expect("finalize purchase");

    let movement = stock_movements::Entity::find_by_id(outcome.ledger.stock_movement_ids[0])
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movement.movement_type, "in");
    assert_eq!(movement.purity, 916);
    assert_eq!(movement.weight_delta, dec!(50.000));

    let category = inventory_categories::Entity::find_by_id(category_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(category.current_weight, dec!(50.000));

    // Unpaid balance: a payable credit against the vendor, and no lock.
    let txn = transactions::Entity::find_by_id(outcome.ledger.transaction_ids[0])
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(txn.transaction_type, "credit");
    assert_eq!(txn.amount, dec!(2500.00));
    assert_eq!(txn.party_id, Some(vendor));

    assert!(!outcome.document.locked);
    assert_eq!(outcome.document.status, "finalized");
}

#[tokio::test]
async fn fully_paid_purchase_locks_and_draws_down_account() {
    let db = test_db().await;
    let vendor = seed_party(&db, "Bullion House", PartyType::Vendor).await;
    let account = seed_account(&db, "Shop Cash", dec!(10000.00)).await;
    seed_category(&db, "Raw Gold").await;

    let purchase = draft_purchase(
        &db,
        vendor,
        Some("Raw Gold"),
        dec!(50.000),
        999,
        dec!(2500.00),
        dec!(2500.00),
        Some(account),
    )
    .await;

    let repo = FinalizeRepository::new(db.clone(), valuation());
    let outcome = repo
        .finalize_purchase(purchase.purchase.id, &admin())
        .await
        .expect("finalize purchase");

    assert!(outcome.document.locked);
    assert!(outcome.document.locked_at.is_some());
    assert_eq!(outcome.document.locked_by.as_deref(), Some("Meera"));

    // The paying account was debited: 10000 − 2500.
    let account = karat_db::entities::accounts::Entity::find_by_id(account)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.current_balance, dec!(7500.00));
}

#[tokio::test]
async fn stock_round_trip_holds_to_three_decimals() {
    let db = test_db().await;
    let vendor = seed_party(&db, "Bullion House", PartyType::Vendor).await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    let category_id = seed_category(&db, "Gold Bangles").await;

    let repo = FinalizeRepository::new(db.clone(), valuation());

    let purchase = draft_purchase(
        &db,
        vendor,
        Some("Gold Bangles"),
        dec!(50.250),
        999,
        dec!(2500.00),
        dec!(0),
        None,
    )
    .await;
    repo.finalize_purchase(purchase.purchase.id, &admin())
        .await
        .expect("finalize purchase");

    let mut line = standard_line(Some("Gold Bangles"));
    line.weight = dec!(20.125);
    let invoice = draft_invoice(&db, Some(customer), None, None, vec![line], today()).await;
    repo.finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize invoice");

    // 0 + 50.250 − 20.125, exact to 3 decimals.
    let category = inventory_categories::Entity::find_by_id(category_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(category.current_weight, dec!(30.125));
    assert_eq!(category.current_qty, dec!(0));
}

#[tokio::test]
async fn failed_finalize_leaves_no_partial_state() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    seed_category(&db, "Gold Bangles").await;
    let card_id = seed_job_card(&db, "JC-0016", "Ravi").await;

    let invoice = draft_invoice(
        &db,
        Some(customer),
        None,
        Some(card_id),
        vec![standard_line(Some("Gold Bangles"))],
        today(),
    )
    .await;

    // The card vanishes between draft and finalize; the lock step must
    // fail and roll everything back.
    job_cards::Entity::delete_by_id(card_id)
        .exec(&db)
        .await
        .unwrap();

    let repo = FinalizeRepository::new(db.clone(), valuation());
    let result = repo.finalize_invoice(invoice.invoice.id, &admin()).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));

    let reloaded = InvoiceRepository::new(db.clone())
        .get(invoice.invoice.id)
        .await
        .unwrap();
    assert_eq!(reloaded.invoice.status, "draft");
    assert!(reloaded.invoice.finalized_at.is_none());
    assert_eq!(ledger_counts(&db).await, (0, 0, 0));

    let category = inventory_categories::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(category.current_weight, dec!(0));
}

#[tokio::test]
async fn finalize_unknown_invoice_is_not_found() {
    let db = test_db().await;
    let repo = FinalizeRepository::new(db.clone(), valuation());
    let result = repo.finalize_invoice(uuid::Uuid::new_v4(), &admin()).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn invoice_numbers_are_sequential() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;

    let first = draft_invoice(
        &db,
        Some(customer),
        None,
        None,
        vec![standard_line(None)],
        today(),
    )
    .await;
    let second = draft_invoice(
        &db,
        Some(customer),
        None,
        None,
        vec![standard_line(None)],
        today(),
    )
    .await;

    let first_seq: u32 = first.invoice.invoice_number[9..].parse().unwrap();
    let second_seq: u32 = second.invoice.invoice_number[9..].parse().unwrap();
    assert_eq!(second_seq, first_seq + 1);

    let total = invoices::Entity::find().count(&db).await.unwrap();
    assert_eq!(total, 2);
}
