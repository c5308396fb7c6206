//! `SeaORM` entity definitions.
//!
//! Status and kind columns are stored as plain strings and parsed into the
//! closed enums from `karat-core` at the boundary, keeping one schema usable
//! by both the Postgres runtime and the SQLite test backend.

pub mod accounts;
pub mod audit_log;
pub mod gold_ledger_entries;
pub mod inventory_categories;
pub mod invoice_items;
pub mod invoices;
pub mod job_cards;
pub mod parties;
pub mod purchase_items;
pub mod purchases;
pub mod stock_movements;
pub mod transactions;
