//! Balance aggregation over ledger slices.
//!
//! These functions take plain slices of already-fetched rows so they stay
//! pure; the persistence layer decides what to fetch.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use karat_shared::types::{round_money, round_weight};

use crate::ledger::GoldEntryType;

use super::aging::bucket_for_elapsed_days;
use super::types::{AgingSplit, GoldPosition, MoneyPosition, OutstandingRow, OutstandingSummary};

/// An open document balance feeding the money aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenBalance {
    /// Date of the originating document.
    pub document_date: NaiveDate,
    /// Remaining balance.
    pub amount: Decimal,
}

/// Nets a party's gold ledger into a position: IN minus OUT, 3 decimals.
#[must_use]
pub fn gold_position(entries: &[(GoldEntryType, Decimal)]) -> GoldPosition {
    let due_from_party: Decimal = entries
        .iter()
        .filter(|(entry_type, _)| *entry_type == GoldEntryType::In)
        .map(|(_, weight)| *weight)
        .sum();
    let due_to_party: Decimal = entries
        .iter()
        .filter(|(entry_type, _)| *entry_type == GoldEntryType::Out)
        .map(|(_, weight)| *weight)
        .sum();

    let due_from_party = round_weight(due_from_party);
    let due_to_party = round_weight(due_to_party);

    GoldPosition {
        due_from_party,
        due_to_party,
        net: round_weight(due_from_party - due_to_party),
    }
}

/// Computes a party's money position.
///
/// Owed by the party: open invoice balances. Owed to the party: open
/// purchase balances plus non-purchase credit transactions (purchase-linked
/// credits are already represented by the purchase balances themselves).
#[must_use]
pub fn money_position(
    open_invoices: &[OpenBalance],
    open_purchases: &[OpenBalance],
    other_credits: Decimal,
) -> MoneyPosition {
    let due_from_party: Decimal =
        round_money(open_invoices.iter().map(|balance| balance.amount).sum());
    let due_to_party: Decimal = round_money(
        open_purchases
            .iter()
            .map(|balance| balance.amount)
            .sum::<Decimal>()
            + other_credits,
    );

    MoneyPosition {
        due_from_party,
        due_to_party,
        net: round_money(due_from_party - due_to_party),
    }
}

/// Buckets open balances by elapsed days since their document date.
#[must_use]
pub fn aging_split(open: &[OpenBalance], today: NaiveDate) -> AgingSplit {
    let mut split = AgingSplit::default();
    for balance in open {
        let elapsed = (today - balance.document_date).num_days();
        split.add(bucket_for_elapsed_days(elapsed), round_money(balance.amount));
    }
    split
}

/// Totals outstanding rows into the report summary.
#[must_use]
pub fn summarize_outstanding(rows: &[OutstandingRow]) -> OutstandingSummary {
    let total_due_from: Decimal = rows.iter().map(|row| row.due_from.total()).sum();
    let total_due_to: Decimal = rows.iter().map(|row| row.due_to).sum();

    OutstandingSummary {
        total_due_from: round_money(total_due_from),
        total_due_to: round_money(total_due_to),
        net: round_money(total_due_from - total_due_to),
        parties_with_dues: rows.len(),
    }
}
