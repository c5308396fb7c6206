//! Core business logic for Karat.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `document` - Invoice/purchase documents, status machines, totals
//! - `ledger` - Draft entries for the stock, money, and gold ledgers
//! - `finalize` - Planning the atomic draft → finalized commit
//! - `payment` - Payment settlement, including gold exchange
//! - `party` - Balance aggregation and aging
//! - `lock` - Cross-document lock and override policy
//! - `audit` - Audit trail payloads

pub mod audit;
pub mod document;
pub mod finalize;
pub mod ledger;
pub mod lock;
pub mod party;
pub mod payment;
