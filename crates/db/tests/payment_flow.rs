//! End-to-end payment settlement tests over a real (SQLite) store.

mod common;

use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use common::{
    admin, draft_invoice, seed_account, seed_gold_in, seed_party, standard_line, test_db, today,
    valuation,
};
use karat_core::ledger::PaymentMode;
use karat_core::party::PartyType;
use karat_core::payment::PaymentRequest;
use karat_db::entities::{accounts, gold_ledger_entries, invoices, transactions};
use karat_db::repositories::StoreError;
use karat_db::{FinalizeRepository, GoldLedgerRepository, PaymentRepository};
use karat_shared::types::Purity;

fn cash_request(amount: rust_decimal::Decimal, account_id: Uuid) -> PaymentRequest {
    PaymentRequest {
        mode: PaymentMode::Cash,
        amount: Some(amount),
        account_id: Some(account_id),
        gold_weight_grams: None,
        rate_per_gram: None,
        purity_entered: None,
    }
}

fn gold_request(weight: rust_decimal::Decimal, rate: rust_decimal::Decimal) -> PaymentRequest {
    PaymentRequest {
        mode: PaymentMode::GoldExchange,
        amount: None,
        account_id: None,
        gold_weight_grams: Some(weight),
        rate_per_gram: Some(rate),
        purity_entered: Some(Purity::new(916).unwrap()),
    }
}

/// Seeds a finalized invoice with a 1155.00 balance for a saved customer.
async fn finalized_invoice(db: &sea_orm::DatabaseConnection, customer: Uuid) -> Uuid {
    let invoice = draft_invoice(
        db,
        Some(customer),
        None,
        None,
        vec![standard_line(None)],
        today(),
    )
    .await;
    FinalizeRepository::new(db.clone(), valuation())
        .finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize invoice");
    invoice.invoice.id
}

#[tokio::test]
async fn cash_payments_walk_partial_to_paid() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    let account = seed_account(&db, "Shop Cash", dec!(0)).await;
    let invoice_id = finalized_invoice(&db, customer).await;

    let repo = PaymentRepository::new(db.clone());

    let receipt = repo
        .add_payment(invoice_id, &cash_request(dec!(155.00), account), &admin())
        .await
        .expect("partial payment");
    assert_eq!(receipt.paid_amount, dec!(155.00));
    assert_eq!(receipt.balance_due, dec!(1000.00));
    assert_eq!(receipt.payment_status, "partial");
    assert!(receipt.gold_weight_grams.is_none());
    assert!(receipt.gold_money_value.is_none());

    let second = repo
        .add_payment(invoice_id, &cash_request(dec!(1000.00), account), &admin())
        .await
        .expect("closing payment");
    assert_eq!(second.balance_due, dec!(0.00));
    assert_eq!(second.payment_status, "paid");
    assert_ne!(receipt.transaction_number, second.transaction_number);

    // Credits top the receiving account up.
    let account = accounts::Entity::find_by_id(account)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.current_balance, dec!(1155.00));
}

#[tokio::test]
async fn overpayment_fails_with_no_state_change() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    let account = seed_account(&db, "Shop Cash", dec!(0)).await;
    let invoice_id = finalized_invoice(&db, customer).await;

    let txns_before = transactions::Entity::find().count(&db).await.unwrap();

    let repo = PaymentRepository::new(db.clone());
    let err = repo
        .add_payment(invoice_id, &cash_request(dec!(2000.00), account), &admin())
        .await
        .expect_err("overpayment must fail");
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(err.to_string().contains("exceeds remaining balance"));

    let invoice = invoices::Entity::find_by_id(invoice_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invoice.paid_amount, dec!(0.00));
    assert_eq!(invoice.balance_due, dec!(1155.00));
    assert_eq!(
        transactions::Entity::find().count(&db).await.unwrap(),
        txns_before
    );
}

#[tokio::test]
async fn gold_exchange_settles_weight_times_rate() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    seed_gold_in(&db, customer, dec!(30.000)).await;

    // 20.000 g at 20.00/g + 100.00 making = 500.00, 5% VAT → 525.00 due.
    let mut line = standard_line(None);
    line.rate_per_gram = dec!(20.00);
    let invoice = draft_invoice(&db, Some(customer), None, None, vec![line], today()).await;
    FinalizeRepository::new(db.clone(), valuation())
        .finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize invoice");

    let repo = PaymentRepository::new(db.clone());
    // 25.000 g at 20.00/g clears exactly 500.00 of the 525.00 due.
    let receipt = repo
        .add_payment(
            invoice.invoice.id,
            &gold_request(dec!(25.000), dec!(20.00)),
            &admin(),
        )
        .await
        .expect("gold exchange payment");

    assert_eq!(receipt.gold_weight_grams, Some(dec!(25.000)));
    assert_eq!(receipt.gold_money_value, Some(dec!(500.00)));
    assert_eq!(receipt.paid_amount, dec!(500.00));
    assert_eq!(receipt.balance_due, dec!(25.00));
    assert_eq!(receipt.payment_status, "partial");

    // The party's gold position dropped by exactly 25.000 g.
    let net = GoldLedgerRepository::new(db.clone())
        .net_balance(customer)
        .await
        .unwrap();
    assert_eq!(net, dec!(5.000));

    let out_entries = gold_ledger_entries::Entity::find().all(&db).await.unwrap();
    let exchange = out_entries
        .iter()
        .find(|entry| entry.entry_type == "out")
        .expect("exchange OUT entry");
    assert_eq!(exchange.purpose, "exchange");
    assert_eq!(exchange.weight, dec!(25.000));
    assert_eq!(exchange.reference_id, invoice.invoice.id);
}

#[tokio::test]
async fn gold_exchange_rejected_for_walk_in() {
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
    FinalizeRepository::new(db.clone(), valuation())
        .finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize walk-in invoice");

    let err = PaymentRepository::new(db.clone())
        .add_payment(
            invoice.invoice.id,
            &gold_request(dec!(5.000), dec!(20.00)),
            &admin(),
        )
        .await
        .expect_err("walk-in gold exchange must fail");
    assert!(err.to_string().contains("walk-in"));
}

#[tokio::test]
async fn insufficient_gold_reports_both_figures() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    seed_gold_in(&db, customer, dec!(10.000)).await;
    let invoice_id = finalized_invoice(&db, customer).await;

    let err = PaymentRepository::new(db.clone())
        .add_payment(invoice_id, &gold_request(dec!(25.000), dec!(20.00)), &admin())
        .await
        .expect_err("insufficient gold must fail");

    let message = err.to_string();
    assert!(message.contains("Insufficient gold balance"));
    assert!(message.contains("10.000"));
    assert!(message.contains("25.000"));

    // Nothing was drawn down.
    let net = GoldLedgerRepository::new(db.clone())
        .net_balance(customer)
        .await
        .unwrap();
    assert_eq!(net, dec!(10.000));
}

#[tokio::test]
async fn non_positive_gold_inputs_are_rejected() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    seed_gold_in(&db, customer, dec!(30.000)).await;
    let invoice_id = finalized_invoice(&db, customer).await;

    let repo = PaymentRepository::new(db.clone());

    let err = repo
        .add_payment(invoice_id, &gold_request(dec!(0), dec!(20.00)), &admin())
        .await
        .expect_err("zero weight must fail");
    assert!(err.to_string().contains("must be positive"));

    let err = repo
        .add_payment(invoice_id, &gold_request(dec!(5.000), dec!(-1.00)), &admin())
        .await
        .expect_err("negative rate must fail");
    assert!(err.to_string().contains("must be positive"));
}

#[tokio::test]
async fn payments_require_a_finalized_invoice() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    let account = seed_account(&db, "Shop Cash", dec!(0)).await;

    let draft = draft_invoice(
        &db,
        Some(customer),
        None,
        None,
        vec![standard_line(None)],
        today(),
    )
    .await;

    let err = PaymentRepository::new(db.clone())
        .add_payment(draft.invoice.id, &cash_request(dec!(100.00), account), &admin())
        .await
        .expect_err("draft payment must fail");
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(err.to_string().contains("draft"));
}

#[tokio::test]
async fn missing_account_is_named() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    let invoice_id = finalized_invoice(&db, customer).await;

    let mut request = cash_request(dec!(100.00), Uuid::new_v4());
    request.account_id = None;

    let err = PaymentRepository::new(db.clone())
        .add_payment(invoice_id, &request, &admin())
        .await
        .expect_err("missing account must fail");
    assert!(err.to_string().contains("account_id"));
}
