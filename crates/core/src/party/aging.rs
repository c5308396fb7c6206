//! Aging bucket classification.

use super::types::AgeBucket;

/// Classifies elapsed days since a document's date into an aging bucket.
///
/// Post-dated documents (negative elapsed days) clamp into the first
/// bucket.
#[must_use]
pub fn bucket_for_elapsed_days(elapsed_days: i64) -> AgeBucket {
    if elapsed_days <= 7 {
        AgeBucket::Days0To7
    } else if elapsed_days <= 30 {
        AgeBucket::Days8To30
    } else {
        AgeBucket::Days31Plus
    }
}
