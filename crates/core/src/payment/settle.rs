//! Payment settlement planning.

use rust_decimal::Decimal;
use uuid::Uuid;

use karat_shared::types::{round_money, round_weight};

use crate::document::{DocumentStatus, InvoiceDoc, PaymentStatus};
use crate::ledger::{
    GoldEntryDraft, GoldEntryType, GoldPurpose, LedgerReference, PaymentMode, TransactionDraft,
    TransactionType,
};

use super::error::PaymentError;
use super::types::{GoldSettlement, PaymentPlan, PaymentRequest};

/// Money ledger category for payments received against invoices.
pub const INVOICE_PAYMENT_CATEGORY: &str = "Invoice Payment";

/// Plans a payment against a finalized invoice.
///
/// Money modes append one credit transaction on the receiving account
/// (credits top an account up, debits draw it down). Gold exchange
/// additionally draws down the customer's gold position: the
/// ledger must net to at least the requested weight, and the money value
/// (`weight × rate`) must not exceed the remaining balance.
///
/// `gold_balance_lookup` returns the party's current net gold position
/// (IN − OUT); it is only consulted for gold exchange.
///
/// # Errors
///
/// Returns a `PaymentError` naming the violated rule. No partial plan is
/// ever returned.
pub fn plan_payment<F>(
    invoice: &InvoiceDoc,
    request: &PaymentRequest,
    gold_balance_lookup: F,
) -> Result<PaymentPlan, PaymentError>
where
    F: Fn(Uuid) -> Decimal,
{
    if invoice.status != DocumentStatus::Finalized {
        return Err(PaymentError::DocumentNotFinalized(
            invoice.invoice_number.clone(),
        ));
    }

    let reference = LedgerReference::invoice(invoice.id);

    let (amount_applied, transaction, gold_entry, gold_settlement) = if request.mode.is_money_mode()
    {
        let amount = request.amount.ok_or(PaymentError::MissingField("amount"))?;
        if amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount(amount));
        }
        let account_id = request
            .account_id
            .ok_or(PaymentError::MissingField("account_id"))?;
        let amount = round_money(amount);
        if amount > invoice.balance_due {
            return Err(PaymentError::ExceedsBalanceDue {
                amount,
                balance_due: invoice.balance_due,
            });
        }

        let transaction = TransactionDraft {
            account_id: Some(account_id),
            party_id: invoice.party_id,
            transaction_type: TransactionType::Credit,
            amount,
            category: INVOICE_PAYMENT_CATEGORY.to_string(),
            payment_mode: Some(request.mode),
            reference,
        };

        (amount, transaction, None, None)
    } else {
        let weight = request
            .gold_weight_grams
            .ok_or(PaymentError::MissingField("gold_weight_grams"))?;
        if weight <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveGoldWeight(weight));
        }
        let rate = request
            .rate_per_gram
            .ok_or(PaymentError::MissingField("rate_per_gram"))?;
        if rate <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveRate(rate));
        }
        let purity = request
            .purity_entered
            .ok_or(PaymentError::MissingField("purity_entered"))?;

        let party_id = invoice.party_id.ok_or(PaymentError::WalkInGoldExchange)?;

        let weight = round_weight(weight);
        let available = gold_balance_lookup(party_id);
        if available < weight {
            return Err(PaymentError::InsufficientGoldBalance {
                available,
                requested: weight,
            });
        }

        let money_value = round_money(weight * rate);
        if money_value > invoice.balance_due {
            return Err(PaymentError::ExceedsBalanceDue {
                amount: money_value,
                balance_due: invoice.balance_due,
            });
        }

        let transaction = TransactionDraft {
            account_id: None,
            party_id: Some(party_id),
            transaction_type: TransactionType::Credit,
            amount: money_value,
            category: INVOICE_PAYMENT_CATEGORY.to_string(),
            payment_mode: Some(PaymentMode::GoldExchange),
            reference,
        };

        let gold_entry = GoldEntryDraft {
            party_id,
            entry_type: GoldEntryType::Out,
            weight,
            purity,
            purpose: GoldPurpose::Exchange,
            reference,
        };

        let settlement = GoldSettlement {
            weight_grams: weight,
            rate_per_gram: rate,
            purity,
            money_value,
        };

        (money_value, transaction, Some(gold_entry), Some(settlement))
    };

    let new_paid_amount = round_money(invoice.paid_amount + amount_applied);
    let new_balance_due = round_money(invoice.balance_due - amount_applied);
    let new_payment_status = PaymentStatus::from_amounts(new_paid_amount, new_balance_due);

    Ok(PaymentPlan {
        invoice_id: invoice.id,
        mode: request.mode,
        amount_applied,
        new_paid_amount,
        new_balance_due,
        new_payment_status,
        transaction,
        gold_entry,
        gold_settlement,
    })
}
