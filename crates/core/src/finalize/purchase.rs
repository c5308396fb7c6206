//! Purchase finalization planning.

use rust_decimal::Decimal;
use serde_json::json;

use karat_shared::types::Purity;

use crate::audit::{AuditAction, AuditDraft, AuditModule};
use crate::document::{DocumentStatus, PurchaseDoc};
use crate::ledger::{
    GoldEntryDraft, GoldEntryType, GoldPurpose, LedgerReference, MovementType, StockMovementDraft,
    TransactionDraft, TransactionType,
};

use super::error::FinalizeError;
use super::invoice::UNCATEGORIZED_ITEM;
use super::plan::{CategoryRef, FinalizationPlan, LockRequest};

/// Money ledger category for money paid out against a purchase.
pub const PURCHASE_PAYMENT_CATEGORY: &str = "Purchase Payment";

/// Money ledger category for the payable owed to a vendor.
pub const PURCHASE_PAYABLE_CATEGORY: &str = "Purchase Payable";

/// Plans the finalization of a vendor purchase.
///
/// Stock comes in at the shop's fixed valuation purity, never the vendor's
/// claimed `entered_purity`. Money paid debits the paying account; any
/// remaining balance becomes a payable credit against the vendor. Advance
/// and exchange gold settle on the gold ledger. The purchase locks only when
/// nothing remains due.
///
/// # Errors
///
/// Returns an error when the purchase is not a draft, has no items, records
/// a payment without a paying account, or carries a non-positive gold
/// settlement weight. No partial plan is ever returned.
pub fn plan_purchase_finalization<F>(
    purchase: &PurchaseDoc,
    valuation_purity: Purity,
    category_lookup: F,
) -> Result<FinalizationPlan, FinalizeError>
where
    F: Fn(&str) -> Option<CategoryRef>,
{
    if purchase.status != DocumentStatus::Draft {
        return Err(FinalizeError::AlreadyFinalized(
            purchase.purchase_number.clone(),
        ));
    }
    if purchase.items.is_empty() {
        return Err(FinalizeError::EmptyDocument(
            purchase.purchase_number.clone(),
        ));
    }
    if purchase.paid_amount > Decimal::ZERO && purchase.paid_from_account_id.is_none() {
        return Err(FinalizeError::MissingPayingAccount(
            purchase.purchase_number.clone(),
        ));
    }

    let reference = LedgerReference::purchase(purchase.id);

    let stock_movements = purchase
        .items
        .iter()
        .filter(|item| item.weight_grams > Decimal::ZERO)
        .map(|item| {
            let (category_id, category_name) = resolve_item_category(
                item.category_name.as_deref(),
                &item.description,
                &category_lookup,
            );
            StockMovementDraft {
                category_id,
                category_name,
                movement_type: MovementType::In,
                qty_delta: item.qty,
                weight_delta: item.weight_grams,
                // Booked at the shop's valuation purity; the vendor's claim
                // stays on the purchase item only.
                purity: valuation_purity,
                reference,
            }
        })
        .collect();

    let mut transactions = Vec::new();
    if purchase.paid_amount > Decimal::ZERO {
        transactions.push(TransactionDraft {
            account_id: purchase.paid_from_account_id,
            party_id: None,
            transaction_type: TransactionType::Debit,
            amount: purchase.paid_amount,
            category: PURCHASE_PAYMENT_CATEGORY.to_string(),
            payment_mode: None,
            reference,
        });
    }
    if purchase.balance_due > Decimal::ZERO {
        transactions.push(TransactionDraft {
            account_id: None,
            party_id: Some(purchase.vendor_id),
            transaction_type: TransactionType::Credit,
            amount: purchase.balance_due,
            category: PURCHASE_PAYABLE_CATEGORY.to_string(),
            payment_mode: None,
            reference,
        });
    }

    let mut gold_entries = Vec::new();
    if let Some(weight) = purchase.advance_gold_weight {
        if weight <= Decimal::ZERO {
            return Err(FinalizeError::NonPositiveGoldWeight(weight));
        }
        gold_entries.push(GoldEntryDraft {
            party_id: purchase.vendor_id,
            entry_type: GoldEntryType::Out,
            weight,
            purity: purchase.advance_gold_purity.unwrap_or(valuation_purity),
            purpose: GoldPurpose::AdvanceGold,
            reference,
        });
    }
    if let Some(weight) = purchase.exchange_gold_weight {
        if weight <= Decimal::ZERO {
            return Err(FinalizeError::NonPositiveGoldWeight(weight));
        }
        gold_entries.push(GoldEntryDraft {
            party_id: purchase.vendor_id,
            entry_type: GoldEntryType::In,
            weight,
            purity: purchase.exchange_gold_purity.unwrap_or(valuation_purity),
            purpose: GoldPurpose::Exchange,
            reference,
        });
    }

    // A purchase locks only once nothing remains due; partially paid
    // purchases stay open indefinitely.
    let lock_requests = if purchase.balance_due.is_zero() {
        vec![LockRequest::Purchase {
            purchase_id: purchase.id,
        }]
    } else {
        Vec::new()
    };

    let audit = AuditDraft::new(
        AuditModule::Purchase,
        purchase.id,
        AuditAction::Finalize,
        json!({
            "purchase_number": purchase.purchase_number,
            "total_amount": purchase.total_amount.to_string(),
            "paid_amount": purchase.paid_amount.to_string(),
            "balance_due": purchase.balance_due.to_string(),
            "valuation_purity": valuation_purity.per_mille(),
        }),
    );

    Ok(FinalizationPlan {
        document_id: purchase.id,
        stock_movements,
        transactions,
        gold_entries,
        lock_requests,
        audit,
    })
}

fn resolve_item_category<F>(
    category_name: Option<&str>,
    description: &str,
    category_lookup: &F,
) -> (Option<uuid::Uuid>, String)
where
    F: Fn(&str) -> Option<CategoryRef>,
{
    if let Some(name) = category_name.map(str::trim).filter(|name| !name.is_empty()) {
        return match category_lookup(name) {
            Some(category) => (Some(category.id), category.name),
            None => (None, name.to_string()),
        };
    }

    let description = description.trim();
    if description.is_empty() {
        (None, UNCATEGORIZED_ITEM.to_string())
    } else {
        (None, description.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PurchaseItem;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn item(weight: Decimal, entered_purity: u16) -> PurchaseItem {
        PurchaseItem {
            description: "Old gold".to_string(),
            category_name: Some("Raw gold".to_string()),
            qty: dec!(1),
            weight_grams: weight,
            entered_purity: Purity::new(entered_purity).unwrap(),
        }
    }

    fn draft_purchase(paid: Decimal, balance: Decimal) -> PurchaseDoc {
        PurchaseDoc {
            id: Uuid::new_v4(),
            purchase_number: "PUR-2026-0007".to_string(),
            vendor_id: Uuid::new_v4(),
            status: DocumentStatus::Draft,
            purchase_date: NaiveDate::from_ymd_opt(2026, 7, 15).unwrap(),
            items: vec![item(dec!(50.000), 999)],
            total_amount: paid + balance,
            paid_amount: paid,
            balance_due: balance,
            paid_from_account_id: (paid > Decimal::ZERO).then(Uuid::new_v4),
            advance_gold_weight: None,
            advance_gold_purity: None,
            exchange_gold_weight: None,
            exchange_gold_purity: None,
        }
    }

    fn valuation() -> Purity {
        Purity::new(916).unwrap()
    }

    fn no_catalog(_name: &str) -> Option<CategoryRef> {
        None
    }

    #[test]
    fn test_stock_in_uses_valuation_purity_not_entered() {
        let purchase = draft_purchase(dec!(0), dec!(2500.00));
        let plan = plan_purchase_finalization(&purchase, valuation(), no_catalog).unwrap();

        let movement = &plan.stock_movements[0];
        assert_eq!(movement.movement_type, MovementType::In);
        assert_eq!(movement.qty_delta, dec!(1));
        assert_eq!(movement.weight_delta, dec!(50.000));
        // Vendor claimed 999; the books say 916.
        assert_eq!(movement.purity.per_mille(), 916);
    }

    #[test]
    fn test_paid_amount_debits_paying_account() {
        let purchase = draft_purchase(dec!(1000.00), dec!(1500.00));
        let plan = plan_purchase_finalization(&purchase, valuation(), no_catalog).unwrap();

        let paid = plan
            .transactions
            .iter()
            .find(|t| t.category == PURCHASE_PAYMENT_CATEGORY)
            .expect("paid transaction");
        assert_eq!(paid.transaction_type, TransactionType::Debit);
        assert_eq!(paid.amount, dec!(1000.00));
        assert_eq!(paid.account_id, purchase.paid_from_account_id);
    }

    #[test]
    fn test_balance_due_credits_vendor_payable() {
        let purchase = draft_purchase(dec!(1000.00), dec!(1500.00));
        let plan = plan_purchase_finalization(&purchase, valuation(), no_catalog).unwrap();

        let payable = plan
            .transactions
            .iter()
            .find(|t| t.category == PURCHASE_PAYABLE_CATEGORY)
            .expect("payable transaction");
        assert_eq!(payable.transaction_type, TransactionType::Credit);
        assert_eq!(payable.amount, dec!(1500.00));
        assert_eq!(payable.party_id, Some(purchase.vendor_id));
        assert_eq!(payable.account_id, None);
    }

    #[test]
    fn test_paid_without_account_is_rejected() {
        let mut purchase = draft_purchase(dec!(1000.00), dec!(1500.00));
        purchase.paid_from_account_id = None;

        let result = plan_purchase_finalization(&purchase, valuation(), no_catalog);
        assert!(matches!(result, Err(FinalizeError::MissingPayingAccount(_))));
    }

    #[test]
    fn test_fully_paid_purchase_locks() {
        let purchase = draft_purchase(dec!(2500.00), dec!(0));
        let plan = plan_purchase_finalization(&purchase, valuation(), no_catalog).unwrap();

        assert_eq!(
            plan.lock_requests,
            vec![LockRequest::Purchase {
                purchase_id: purchase.id
            }]
        );
    }

    #[test]
    fn test_partially_paid_purchase_stays_unlocked() {
        let purchase = draft_purchase(dec!(1000.00), dec!(1500.00));
        let plan = plan_purchase_finalization(&purchase, valuation(), no_catalog).unwrap();
        assert!(plan.lock_requests.is_empty());
    }

    #[test]
    fn test_advance_gold_goes_out_exchange_comes_in() {
        let mut purchase = draft_purchase(dec!(0), dec!(2500.00));
        purchase.advance_gold_weight = Some(dec!(10.000));
        purchase.advance_gold_purity = Some(Purity::new(999).unwrap());
        purchase.exchange_gold_weight = Some(dec!(4.500));

        let plan = plan_purchase_finalization(&purchase, valuation(), no_catalog).unwrap();
        assert_eq!(plan.gold_entries.len(), 2);

        let advance = &plan.gold_entries[0];
        assert_eq!(advance.entry_type, GoldEntryType::Out);
        assert_eq!(advance.purpose, GoldPurpose::AdvanceGold);
        assert_eq!(advance.weight, dec!(10.000));
        assert_eq!(advance.purity.per_mille(), 999);

        let exchange = &plan.gold_entries[1];
        assert_eq!(exchange.entry_type, GoldEntryType::In);
        assert_eq!(exchange.purpose, GoldPurpose::Exchange);
        assert_eq!(exchange.weight, dec!(4.500));
        // No purity given: falls back to the valuation purity.
        assert_eq!(exchange.purity.per_mille(), 916);
    }

    #[test]
    fn test_non_positive_gold_weight_is_rejected() {
        let mut purchase = draft_purchase(dec!(0), dec!(2500.00));
        purchase.advance_gold_weight = Some(dec!(0));

        let result = plan_purchase_finalization(&purchase, valuation(), no_catalog);
        assert!(matches!(
            result,
            Err(FinalizeError::NonPositiveGoldWeight(_))
        ));
    }

    #[test]
    fn test_already_finalized_is_rejected() {
        let mut purchase = draft_purchase(dec!(0), dec!(2500.00));
        purchase.status = DocumentStatus::Finalized;

        let result = plan_purchase_finalization(&purchase, valuation(), no_catalog);
        assert!(matches!(result, Err(FinalizeError::AlreadyFinalized(_))));
    }

    #[test]
    fn test_audit_records_valuation_purity() {
        let purchase = draft_purchase(dec!(0), dec!(2500.00));
        let plan = plan_purchase_finalization(&purchase, valuation(), no_catalog).unwrap();

        assert_eq!(plan.audit.module, AuditModule::Purchase);
        assert_eq!(plan.audit.action, AuditAction::Finalize);
        assert_eq!(plan.audit.changes["valuation_purity"], 916);
    }
}
