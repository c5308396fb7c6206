//! Payment error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while planning a payment.
///
/// All of these reject the call before any write happens.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Payments only apply to finalized invoices.
    #[error("Invoice {0} is still a draft; finalize it before taking payments")]
    DocumentNotFinalized(String),

    /// A required field is missing for the chosen mode.
    #[error("Missing required field for this payment mode: {0}")]
    MissingField(&'static str),

    /// Money amount must be positive.
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Gold weight must be positive.
    #[error("Gold weight must be positive, got {0}")]
    NonPositiveGoldWeight(Decimal),

    /// Rate per gram must be positive.
    #[error("Rate per gram must be positive, got {0}")]
    NonPositiveRate(Decimal),

    /// Gold exchange needs a saved party to post the gold ledger entry to.
    #[error("Gold exchange requires a saved customer; this invoice is for a walk-in")]
    WalkInGoldExchange,

    /// The party does not hold enough gold with the shop.
    #[error("Insufficient gold balance: available {available} g, requested {requested} g")]
    InsufficientGoldBalance {
        /// What the party's ledger nets to.
        available: Decimal,
        /// What the payment asked for.
        requested: Decimal,
    },

    /// The payment would overshoot the invoice balance.
    #[error("Payment of {amount} exceeds remaining balance of {balance_due}")]
    ExceedsBalanceDue {
        /// Money value of the payment.
        amount: Decimal,
        /// Remaining balance on the invoice.
        balance_due: Decimal,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_messages_report_both_figures() {
        let err = PaymentError::InsufficientGoldBalance {
            available: dec!(10.000),
            requested: dec!(25.000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient gold balance: available 10.000 g, requested 25.000 g"
        );

        let err = PaymentError::ExceedsBalanceDue {
            amount: dec!(600.00),
            balance_due: dec!(500.00),
        };
        assert_eq!(
            err.to_string(),
            "Payment of 600.00 exceeds remaining balance of 500.00"
        );
    }
}
