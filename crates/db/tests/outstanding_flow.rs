//! Party balance aggregation tests over a real (SQLite) store.

mod common;

use chrono::Duration;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{
    admin, draft_invoice, draft_purchase, seed_gold_in, seed_party, standard_line, test_db, today,
    valuation,
};
use karat_core::party::PartyType;
use karat_db::repositories::StoreError;
use karat_db::{FinalizeRepository, PartyRepository};

#[tokio::test]
async fn party_summary_combines_gold_and_money() {
    let db = test_db().await;
    // A vendor who also buys: owes us an invoice, we owe them a purchase.
    let party = seed_party(&db, "Bullion House", PartyType::Vendor).await;
    seed_gold_in(&db, party, dec!(30.000)).await;

    let finalize = FinalizeRepository::new(db.clone(), valuation());

    let invoice = draft_invoice(
        &db,
        Some(party),
        None,
        None,
        vec![standard_line(None)],
        today(),
    )
    .await;
    finalize
        .finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize invoice");

    let purchase = draft_purchase(
        &db,
        party,
        None,
        dec!(10.000),
        999,
        dec!(400.00),
        dec!(0),
        None,
    )
    .await;
    finalize
        .finalize_purchase(purchase.purchase.id, &admin())
        .await
        .expect("finalize purchase");

    let summary = PartyRepository::new(db.clone())
        .summary(party)
        .await
        .expect("party summary");

    assert_eq!(summary.gold.due_from_party, dec!(30.000));
    assert_eq!(summary.gold.due_to_party, dec!(0.000));
    assert_eq!(summary.gold.net, dec!(30.000));

    assert_eq!(summary.money.due_from_party, dec!(1155.00));
    assert_eq!(summary.money.due_to_party, dec!(400.00));
    assert_eq!(summary.money.net, dec!(755.00));
}

#[tokio::test]
async fn outstanding_report_buckets_by_document_age() {
    let db = test_db().await;
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    let finalize = FinalizeRepository::new(db.clone(), valuation());

    // Three open invoices: 6, 14, and 40 days old. Each is one standard
    // line, so each carries a 1155.00 balance.
    for age_days in [6, 14, 40] {
        let invoice = draft_invoice(
            &db,
            Some(customer),
            None,
            None,
            vec![standard_line(None)],
            today() - Duration::days(age_days),
        )
        .await;
        finalize
            .finalize_invoice(invoice.invoice.id, &admin())
            .await
            .expect("finalize invoice");
    }

    let report = PartyRepository::new(db.clone())
        .outstanding(today())
        .await
        .expect("outstanding report");

    assert_eq!(report.parties.len(), 1);
    let row = &report.parties[0];
    assert_eq!(row.party_name, "Ravi");
    assert_eq!(row.due_from.days_0_7, dec!(1155.00));
    assert_eq!(row.due_from.days_8_30, dec!(1155.00));
    assert_eq!(row.due_from.days_31_plus, dec!(1155.00));
    assert_eq!(row.due_to, dec!(0.00));
    assert_eq!(row.net, dec!(3465.00));

    assert_eq!(report.summary.total_due_from, dec!(3465.00));
    assert_eq!(report.summary.total_due_to, dec!(0.00));
    assert_eq!(report.summary.parties_with_dues, 1);
}

#[tokio::test]
async fn settled_documents_leave_the_report() {
    let db = test_db().await;
    let report = PartyRepository::new(db.clone())
        .outstanding(today())
        .await
        .expect("empty report");
    assert!(report.parties.is_empty());
    assert_eq!(report.summary.total_due_from, dec!(0));
    assert_eq!(report.summary.parties_with_dues, 0);

    // A draft invoice must not appear either.
    let customer = seed_party(&db, "Ravi", PartyType::Customer).await;
    draft_invoice(
        &db,
        Some(customer),
        None,
        None,
        vec![standard_line(None)],
        today(),
    )
    .await;

    let report = PartyRepository::new(db.clone())
        .outstanding(today())
        .await
        .expect("report with drafts only");
    assert!(report.parties.is_empty());
}

#[tokio::test]
async fn unknown_party_summary_is_not_found() {
    let db = test_db().await;
    let result = PartyRepository::new(db.clone()).summary(Uuid::new_v4()).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}
