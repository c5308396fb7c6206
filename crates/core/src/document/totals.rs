//! Invoice totals calculation.
//!
//! Metal value is weight times the per-gram rate quoted for the piece's
//! purity; the line total adds the flat making charge. VAT applies to the
//! subtotal. All money rounds to 2 decimal places with Banker's Rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use karat_shared::types::round_money;

use super::types::LineItem;

/// Computed invoice totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line totals (metal value + making charges).
    pub subtotal: Decimal,
    /// VAT on the subtotal.
    pub vat_amount: Decimal,
    /// Subtotal plus VAT.
    pub grand_total: Decimal,
}

/// Metal value of one line: `weight × rate_per_gram`, rounded to money.
#[must_use]
pub fn line_metal_value(line: &LineItem) -> Decimal {
    round_money(line.weight * line.rate_per_gram)
}

/// Total of one line: metal value plus making charge.
#[must_use]
pub fn line_total(line: &LineItem) -> Decimal {
    round_money(line_metal_value(line) + line.making_charge)
}

/// Computes invoice totals from line items and a VAT percentage.
#[must_use]
pub fn compute_invoice_totals(lines: &[LineItem], vat_rate_percent: Decimal) -> InvoiceTotals {
    let subtotal: Decimal = round_money(lines.iter().map(line_total).sum());
    let vat_amount = round_money(subtotal * vat_rate_percent / Decimal::ONE_HUNDRED);
    let grand_total = round_money(subtotal + vat_amount);

    InvoiceTotals {
        subtotal,
        vat_amount,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karat_shared::types::Purity;
    use rust_decimal_macros::dec;

    fn line(weight: Decimal, rate: Decimal, making: Decimal) -> LineItem {
        LineItem {
            description: "Bangle".to_string(),
            category_name: None,
            qty: dec!(1),
            weight,
            purity: Purity::new(916).unwrap(),
            rate_per_gram: rate,
            making_charge: making,
        }
    }

    #[test]
    fn test_reference_invoice() {
        // 20.000 g at 50.00/g with 100.00 making and 5% VAT.
        let lines = vec![line(dec!(20.000), dec!(50.00), dec!(100.00))];

        assert_eq!(line_metal_value(&lines[0]), dec!(1000.00));

        let totals = compute_invoice_totals(&lines, dec!(5));
        assert_eq!(totals.subtotal, dec!(1100.00));
        assert_eq!(totals.vat_amount, dec!(55.00));
        assert_eq!(totals.grand_total, dec!(1155.00));
    }

    #[test]
    fn test_multiple_lines_sum() {
        let lines = vec![
            line(dec!(10.000), dec!(50.00), dec!(50.00)),
            line(dec!(5.500), dec!(60.00), dec!(0)),
        ];

        // 500 + 50 = 550; 330 + 0 = 330; subtotal 880.
        let totals = compute_invoice_totals(&lines, dec!(0));
        assert_eq!(totals.subtotal, dec!(880.00));
        assert_eq!(totals.vat_amount, dec!(0.00));
        assert_eq!(totals.grand_total, dec!(880.00));
    }

    #[test]
    fn test_vat_rounds_to_money() {
        let lines = vec![line(dec!(1.111), dec!(33.33), dec!(0))];
        // metal = round(37.02963) = 37.03; vat 5% = 1.8515 → 1.85 (banker's)
        let totals = compute_invoice_totals(&lines, dec!(5));
        assert_eq!(totals.subtotal, dec!(37.03));
        assert_eq!(totals.vat_amount, dec!(1.85));
        assert_eq!(totals.grand_total, dec!(38.88));
    }

    #[test]
    fn test_empty_invoice_is_zero() {
        let totals = compute_invoice_totals(&[], dec!(5));
        assert_eq!(totals.subtotal, dec!(0.00));
        assert_eq!(totals.vat_amount, dec!(0.00));
        assert_eq!(totals.grand_total, dec!(0.00));
    }
}
