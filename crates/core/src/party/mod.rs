//! Party balance aggregation.
//!
//! Balances are never stored: every read recomputes them from the ledgers
//! and open documents. Money rounds to 2 decimal places, gold to 3.

pub mod aging;
pub mod balance;
pub mod types;

pub use aging::bucket_for_elapsed_days;
pub use balance::{
    OpenBalance, aging_split, gold_position, money_position, summarize_outstanding,
};
pub use types::{
    AgeBucket, AgingSplit, GoldPosition, MoneyPosition, OutstandingReport, OutstandingRow,
    OutstandingSummary, PartySummary, PartyType,
};
