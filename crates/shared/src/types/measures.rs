//! Money and gold-weight precision rules.
//!
//! CRITICAL: Never use floating-point for money or weight calculations.
//! Money carries two decimal places, gold weight three; both round with
//! Banker's Rounding so repeated aggregation stays stable.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places for money amounts.
pub const MONEY_DP: u32 = 2;

/// Decimal places for gold weights in grams.
pub const WEIGHT_DP: u32 = 3;

/// Rounds a money amount to 2 decimal places (Banker's Rounding).
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Rounds a gold weight to 3 decimal places (Banker's Rounding).
#[must_use]
pub fn round_weight(grams: Decimal) -> Decimal {
    grams.round_dp_with_strategy(WEIGHT_DP, RoundingStrategy::MidpointNearestEven)
}

/// Gold purity in per-mille fineness (916 = 22 karat, 999 = 24 karat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Purity(u16);

impl Purity {
    /// Creates a purity, validating the per-mille range.
    ///
    /// # Errors
    ///
    /// Returns an error when the fineness is zero or above 999.
    pub fn new(per_mille: u16) -> Result<Self, String> {
        if per_mille == 0 || per_mille > 999 {
            return Err(format!(
                "Purity must be between 1 and 999 per mille, got {per_mille}"
            ));
        }
        Ok(Self(per_mille))
    }

    /// Returns the fineness in per mille.
    #[must_use]
    pub const fn per_mille(self) -> u16 {
        self.0
    }

    /// Returns the fineness as a decimal fraction (916 → 0.916).
    #[must_use]
    pub fn as_fraction(self) -> Decimal {
        Decimal::new(i64::from(self.0), 3)
    }
}

impl std::fmt::Display for Purity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Purity {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
