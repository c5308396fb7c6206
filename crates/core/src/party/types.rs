//! Party domain types and aggregation results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use karat_shared::types::PartyId;

/// Kind of party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    /// Buys from the shop.
    Customer,
    /// Sells metal to the shop.
    Vendor,
    /// Does job work for the shop.
    Worker,
}

impl PartyType {
    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
            Self::Worker => "worker",
        }
    }
}

impl std::str::FromStr for PartyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "vendor" => Ok(Self::Vendor),
            "worker" => Ok(Self::Worker),
            _ => Err(format!("Unknown party type: {s}")),
        }
    }
}

/// Age classification of an open balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBucket {
    /// 0–7 elapsed days.
    Days0To7,
    /// 8–30 elapsed days.
    Days8To30,
    /// 31 or more elapsed days.
    Days31Plus,
}

impl AgeBucket {
    /// Human-readable bucket label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days0To7 => "0-7",
            Self::Days8To30 => "8-30",
            Self::Days31Plus => "31+",
        }
    }
}

/// An amount split across the three aging buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingSplit {
    /// Due 0–7 days.
    pub days_0_7: Decimal,
    /// Due 8–30 days.
    pub days_8_30: Decimal,
    /// Due 31+ days.
    pub days_31_plus: Decimal,
}

impl AgingSplit {
    /// Adds an amount to the given bucket.
    pub fn add(&mut self, bucket: AgeBucket, amount: Decimal) {
        match bucket {
            AgeBucket::Days0To7 => self.days_0_7 += amount,
            AgeBucket::Days8To30 => self.days_8_30 += amount,
            AgeBucket::Days31Plus => self.days_31_plus += amount,
        }
    }

    /// Sum across all buckets.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.days_0_7 + self.days_8_30 + self.days_31_plus
    }
}

/// A party's gold position with the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldPosition {
    /// Gold the shop holds for the party (IN entries), grams.
    pub due_from_party: Decimal,
    /// Gold the shop handed out (OUT entries), grams.
    pub due_to_party: Decimal,
    /// `due_from_party − due_to_party`.
    pub net: Decimal,
}

/// A party's money position with the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyPosition {
    /// Open invoice balances owed by the party.
    pub due_from_party: Decimal,
    /// Open purchase balances and other credits owed to the party.
    pub due_to_party: Decimal,
    /// `due_from_party − due_to_party`.
    pub net: Decimal,
}

/// Full derived summary for one party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartySummary {
    /// The party.
    pub party_id: PartyId,
    /// Gold position, 3 decimal places.
    pub gold: GoldPosition,
    /// Money position, 2 decimal places.
    pub money: MoneyPosition,
}

/// One row of the outstanding report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingRow {
    /// The party.
    pub party_id: PartyId,
    /// Display name.
    pub party_name: String,
    /// Kind of party.
    pub party_type: PartyType,
    /// Money owed by the party, split by age.
    pub due_from: AgingSplit,
    /// Money owed to the party.
    pub due_to: Decimal,
    /// `due_from.total() − due_to`.
    pub net: Decimal,
}

/// Grand totals of the outstanding report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingSummary {
    /// Total money owed by all parties.
    pub total_due_from: Decimal,
    /// Total money owed to all parties.
    pub total_due_to: Decimal,
    /// `total_due_from − total_due_to`.
    pub net: Decimal,
    /// Number of parties with any open balance.
    pub parties_with_dues: usize,
}

/// The outstanding report: per-party rows plus grand totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingReport {
    /// Per-party rows.
    pub parties: Vec<OutstandingRow>,
    /// Grand totals.
    pub summary: OutstandingSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_party_type_round_trip() {
        for kind in [PartyType::Customer, PartyType::Vendor, PartyType::Worker] {
            assert_eq!(PartyType::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(PartyType::from_str("supplier").is_err());
    }

    #[test]
    fn test_bucket_labels() {
        assert_eq!(AgeBucket::Days0To7.as_str(), "0-7");
        assert_eq!(AgeBucket::Days8To30.as_str(), "8-30");
        assert_eq!(AgeBucket::Days31Plus.as_str(), "31+");
    }

    #[test]
    fn test_aging_split_accumulates() {
        let mut split = AgingSplit::default();
        split.add(AgeBucket::Days0To7, dec!(100.00));
        split.add(AgeBucket::Days0To7, dec!(50.00));
        split.add(AgeBucket::Days31Plus, dec!(25.00));

        assert_eq!(split.days_0_7, dec!(150.00));
        assert_eq!(split.days_8_30, dec!(0));
        assert_eq!(split.days_31_plus, dec!(25.00));
        assert_eq!(split.total(), dec!(175.00));
    }
}
