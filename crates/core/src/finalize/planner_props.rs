//! Property tests for the finalization planners.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use karat_shared::types::Purity;

use crate::document::{
    DocumentStatus, InvoiceDoc, LineItem, PaymentStatus, PurchaseDoc, PurchaseItem,
};

use super::invoice::plan_invoice_finalization;
use super::plan::CategoryRef;
use super::purchase::plan_purchase_finalization;

fn weight_strategy() -> impl Strategy<Value = Decimal> {
    // Weights in milligrams up to 1 kg, 3 decimal places.
    (1i64..1_000_000i64).prop_map(|mg| Decimal::new(mg, 3))
}

fn purity_strategy() -> impl Strategy<Value = Purity> {
    (1u16..=999u16).prop_map(|p| Purity::new(p).unwrap())
}

fn line_strategy() -> impl Strategy<Value = LineItem> {
    (weight_strategy(), purity_strategy(), "[a-z]{1,12}").prop_map(|(weight, purity, name)| {
        LineItem {
            description: name.clone(),
            category_name: Some(name),
            qty: Decimal::ONE,
            weight,
            purity,
            rate_per_gram: Decimal::new(5000, 2),
            making_charge: Decimal::new(10000, 2),
        }
    })
}

fn invoice_with(lines: Vec<LineItem>) -> InvoiceDoc {
    InvoiceDoc {
        id: Uuid::new_v4(),
        invoice_number: "INV-2026-0100".to_string(),
        party_id: Some(Uuid::new_v4()),
        walk_in_name: None,
        job_card_id: None,
        status: DocumentStatus::Draft,
        payment_status: PaymentStatus::Unpaid,
        invoice_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        lines,
        subtotal: Decimal::ZERO,
        vat_amount: Decimal::ZERO,
        grand_total: Decimal::new(115_500, 2),
        paid_amount: Decimal::ZERO,
        balance_due: Decimal::new(115_500, 2),
    }
}

fn purchase_with(items: Vec<PurchaseItem>, balance: Decimal) -> PurchaseDoc {
    PurchaseDoc {
        id: Uuid::new_v4(),
        purchase_number: "PUR-2026-0100".to_string(),
        vendor_id: Uuid::new_v4(),
        status: DocumentStatus::Draft,
        purchase_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
        items,
        total_amount: balance,
        paid_amount: Decimal::ZERO,
        balance_due: balance,
        paid_from_account_id: None,
        advance_gold_weight: None,
        advance_gold_purity: None,
        exchange_gold_weight: None,
        exchange_gold_purity: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every invoice line with weight produces exactly one Stock OUT
    /// movement with negated deltas, even with an empty catalog.
    #[test]
    fn prop_invoice_outflow_negates_lines(lines in prop::collection::vec(line_strategy(), 1..6)) {
        let invoice = invoice_with(lines.clone());
        let plan = plan_invoice_finalization(&invoice, |_| None).unwrap();

        prop_assert_eq!(plan.stock_movements.len(), lines.len());
        for (movement, line) in plan.stock_movements.iter().zip(&lines) {
            prop_assert_eq!(movement.qty_delta, -line.qty);
            prop_assert_eq!(movement.weight_delta, -line.weight);
            prop_assert!(movement.category_id.is_none());
            prop_assert!(!movement.category_name.is_empty());
        }
    }

    /// Catalog hits carry the catalog's ID and canonical name.
    #[test]
    fn prop_invoice_catalog_hit_resolves_id(lines in prop::collection::vec(line_strategy(), 1..6)) {
        let invoice = invoice_with(lines);
        let category_id = Uuid::new_v4();
        let plan = plan_invoice_finalization(&invoice, |name| {
            Some(CategoryRef { id: category_id, name: name.to_string() })
        })
        .unwrap();

        for movement in &plan.stock_movements {
            prop_assert_eq!(movement.category_id, Some(category_id));
        }
    }

    /// Purchase stock always books at the valuation purity, whatever the
    /// vendor claimed.
    #[test]
    fn prop_purchase_books_valuation_purity(
        weight in weight_strategy(),
        entered in purity_strategy(),
        valuation in purity_strategy(),
    ) {
        let items = vec![PurchaseItem {
            description: "metal".to_string(),
            category_name: None,
            qty: Decimal::ONE,
            weight_grams: weight,
            entered_purity: entered,
        }];
        let purchase = purchase_with(items, Decimal::new(100_000, 2));
        let plan = plan_purchase_finalization(&purchase, valuation, |_| None).unwrap();

        prop_assert_eq!(plan.stock_movements[0].purity, valuation);
        prop_assert_eq!(plan.stock_movements[0].weight_delta, weight);
    }

    /// A purchase locks exactly when nothing remains due.
    #[test]
    fn prop_purchase_lock_tracks_balance(balance_cents in 0i64..1_000_000i64) {
        let balance = Decimal::new(balance_cents, 2);
        let items = vec![PurchaseItem {
            description: "metal".to_string(),
            category_name: None,
            qty: Decimal::ONE,
            weight_grams: Decimal::new(10_000, 3),
            entered_purity: Purity::new(999).unwrap(),
        }];
        let purchase = purchase_with(items, balance);
        let plan = plan_purchase_finalization(
            &purchase,
            Purity::new(916).unwrap(),
            |_| None,
        )
        .unwrap();

        prop_assert_eq!(plan.lock_requests.is_empty(), !balance.is_zero());
    }
}
