//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Every multi-ledger write (finalize, payment, override) runs inside a
//! single database transaction so no partial commit is ever observable.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, AuditRepository, FinalizeRepository, GoldLedgerRepository,
    InventoryRepository, InvoiceRepository, JobCardRepository, MoneyLedgerRepository,
    PartyRepository, PaymentRepository, PurchaseRepository, StoreError,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
