//! Finalization error types.

use thiserror::Error;

/// Errors that can occur while planning a finalization.
///
/// All of these reject the call before any write happens.
#[derive(Debug, Error)]
pub enum FinalizeError {
    /// The document has already been finalized.
    #[error("Document {0} is already finalized")]
    AlreadyFinalized(String),

    /// The document has no line items.
    #[error("Document {0} has no line items to finalize")]
    EmptyDocument(String),

    /// A purchase recorded a paid amount without naming the paying account.
    #[error("Purchase {0} has a paid amount but no paying account")]
    MissingPayingAccount(String),

    /// A gold settlement field is set with a non-positive weight.
    #[error("Gold weight must be positive, got {0}")]
    NonPositiveGoldWeight(rust_decimal::Decimal),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_messages_name_the_rule() {
        assert_eq!(
            FinalizeError::AlreadyFinalized("INV-2026-0001".into()).to_string(),
            "Document INV-2026-0001 is already finalized"
        );
        assert_eq!(
            FinalizeError::NonPositiveGoldWeight(dec!(-1)).to_string(),
            "Gold weight must be positive, got -1"
        );
    }
}
