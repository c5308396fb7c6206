//! Lock and override policy tests over a real (SQLite) store.

mod common;

use rust_decimal_macros::dec;

use common::{
    admin, draft_invoice, seed_category, seed_job_card, seed_party, staff, standard_line, test_db,
    today, valuation,
};
use karat_core::audit::AuditModule;
use karat_core::party::PartyType;
use karat_db::repositories::StoreError;
use karat_db::repositories::invoices::UpdateInvoiceInput;
use karat_db::repositories::job_cards::UpdateJobCardInput;
use karat_db::{AuditRepository, FinalizeRepository, InvoiceRepository, JobCardRepository};

#[tokio::test]
async fn draft_edits_carry_no_warning() {
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

    let repo = InvoiceRepository::new(db.clone());
    let (updated, warning) = repo
        .update(
            invoice.invoice.id,
            UpdateInvoiceInput {
                walk_in_name: Some("Ravi (walk-in)".to_string()),
                ..Default::default()
            },
            &staff(),
            None,
        )
        .await
        .expect("draft edit");

    assert!(warning.is_none());
    assert_eq!(updated.invoice.walk_in_name.as_deref(), Some("Ravi (walk-in)"));
}

#[tokio::test]
async fn draft_line_edits_recompute_totals() {
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

    let mut line = common::standard_line(None);
    line.weight = dec!(10.000);
    line.making_charge = dec!(0);

    let repo = InvoiceRepository::new(db.clone());
    let (updated, _) = repo
        .update(
            invoice.invoice.id,
            UpdateInvoiceInput {
                lines: Some(vec![line]),
                ..Default::default()
            },
            &staff(),
            None,
        )
        .await
        .expect("draft line edit");

    // 10.000 g × 50.00 = 500.00, 5% VAT = 25.00.
    assert_eq!(updated.invoice.subtotal, dec!(500.00));
    assert_eq!(updated.invoice.vat_amount, dec!(25.00));
    assert_eq!(updated.invoice.grand_total, dec!(525.00));
    assert_eq!(updated.invoice.balance_due, dec!(525.00));
}

#[tokio::test]
async fn staff_cannot_touch_finalized_invoices() {
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
        .expect("finalize invoice");

    let repo = InvoiceRepository::new(db.clone());

    let err = repo
        .update(
            invoice.invoice.id,
            UpdateInvoiceInput {
                walk_in_name: Some("Someone else".to_string()),
                ..Default::default()
            },
            &staff(),
            None,
        )
        .await
        .expect_err("staff edit must fail");
    assert!(matches!(err, StoreError::Policy(_)));
    assert!(err.to_string().contains("admin override required"));

    let err = repo
        .delete(invoice.invoice.id, &staff(), None)
        .await
        .expect_err("staff delete must fail");
    assert!(err.to_string().contains("admin override required"));
}

#[tokio::test]
async fn admin_override_edit_warns_and_audits() {
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
        .expect("finalize invoice");

    let repo = InvoiceRepository::new(db.clone());
    let (updated, warning) = repo
        .update(
            invoice.invoice.id,
            UpdateInvoiceInput {
                walk_in_name: Some("Ravi".to_string()),
                ..Default::default()
            },
            &admin(),
            Some("customer asked for a named bill"),
        )
        .await
        .expect("admin override edit");

    let warning = warning.expect("override must warn");
    assert!(warning.message.contains(&invoice.invoice.invoice_number));
    assert!(warning.message.contains("admin override"));
    assert_eq!(updated.invoice.walk_in_name.as_deref(), Some("Ravi"));

    let entries = AuditRepository::new(db.clone())
        .list_for_record(AuditModule::Invoice, invoice.invoice.id)
        .await
        .expect("audit entries");
    let override_entry = entries
        .iter()
        .find(|entry| entry.action == "admin_override_edit")
        .expect("override audit entry");
    assert_eq!(
        override_entry.changes["reason"],
        "customer asked for a named bill"
    );
    assert!(override_entry.changes["locked_at"].is_string());
    assert_eq!(override_entry.changes["locked_by"], "Meera");
}

#[tokio::test]
async fn override_edit_requires_a_reason() {
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
        .expect("finalize invoice");

    let err = InvoiceRepository::new(db.clone())
        .update(
            invoice.invoice.id,
            UpdateInvoiceInput {
                walk_in_name: Some("Ravi".to_string()),
                ..Default::default()
            },
            &admin(),
            None,
        )
        .await
        .expect_err("missing reason must fail");
    assert!(err.to_string().contains("reason"));
}

#[tokio::test]
async fn locked_job_card_mutations_follow_the_policy() {
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
    FinalizeRepository::new(db.clone(), valuation())
        .finalize_invoice(invoice.invoice.id, &admin())
        .await
        .expect("finalize invoice");

    let repo = JobCardRepository::new(db.clone());

    // Staff bounce off the lock.
    let err = repo
        .update(
            card_id,
            UpdateJobCardInput {
                customer_name: Some("Someone".to_string()),
                ..Default::default()
            },
            &staff(),
            None,
        )
        .await
        .expect_err("staff edit must fail");
    assert!(err.to_string().contains("admin override required"));
    assert!(err.to_string().contains("JC-0015"));

    // Admin deletes with a warning naming the locking invoice, and the
    // audit entry reconstructs the card.
    let warning = repo
        .delete(card_id, &admin(), Some("duplicate card"))
        .await
        .expect("admin override delete")
        .expect("override must warn");
    assert!(warning.message.contains(&invoice.invoice.invoice_number));

    let entries = AuditRepository::new(db.clone())
        .list_for_record(AuditModule::JobCard, card_id)
        .await
        .expect("audit entries");
    let delete_entry = entries
        .iter()
        .find(|entry| entry.action == "admin_override_delete")
        .expect("override delete audit entry");
    assert_eq!(delete_entry.changes["jobcard_number"], "JC-0015");
    assert_eq!(delete_entry.changes["customer_name"], "Ravi");
    assert_eq!(delete_entry.changes["reason"], "duplicate card");
}

#[tokio::test]
async fn duplicate_category_names_conflict_insensitively() {
    let db = test_db().await;
    seed_category(&db, "Gold Bangles").await;

    let repo = karat_db::InventoryRepository::new(db.clone());
    let err = repo
        .create_category("  gold   BANGLES ")
        .await
        .expect_err("duplicate category must fail");
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(err.to_string().contains("already exists"));
}
