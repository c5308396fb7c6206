//! Initial database migration.
//!
//! Creates the document store, the three ledgers, the party and account
//! registries, job cards, and the audit log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Parties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Parties::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Parties::Name).string().not_null())
                    .col(ColumnDef::new(Parties::PartyType).string().not_null())
                    .col(ColumnDef::new(Parties::Phone).string().null())
                    .col(ColumnDef::new(Parties::Address).string().null())
                    .col(
                        ColumnDef::new(Parties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Parties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::OpeningBalance)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::CurrentBalance)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryCategories::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryCategories::Name).string().not_null())
                    .col(
                        ColumnDef::new(InventoryCategories::NormalizedName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(InventoryCategories::CurrentQty)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryCategories::CurrentWeight)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryCategories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Invoices::InvoiceNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Invoices::PartyId).uuid().null())
                    .col(ColumnDef::new(Invoices::WalkInName).string().null())
                    .col(ColumnDef::new(Invoices::JobCardId).uuid().null())
                    .col(ColumnDef::new(Invoices::Status).string().not_null())
                    .col(ColumnDef::new(Invoices::PaymentStatus).string().not_null())
                    .col(ColumnDef::new(Invoices::InvoiceDate).date().not_null())
                    .col(ColumnDef::new(Invoices::VatRate).decimal_len(5, 2).not_null())
                    .col(ColumnDef::new(Invoices::Subtotal).decimal_len(14, 2).not_null())
                    .col(
                        ColumnDef::new(Invoices::VatAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::GrandTotal)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::PaidAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::BalanceDue)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::FinalizedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Invoices::FinalizedBy).uuid().null())
                    .col(ColumnDef::new(Invoices::FinalizedByName).string().null())
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_party")
                    .table(Invoices::Table)
                    .col(Invoices::PartyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvoiceItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvoiceItems::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvoiceItems::InvoiceId).uuid().not_null())
                    .col(ColumnDef::new(InvoiceItems::Description).string().not_null())
                    .col(ColumnDef::new(InvoiceItems::CategoryName).string().null())
                    .col(ColumnDef::new(InvoiceItems::Qty).decimal_len(14, 3).not_null())
                    .col(
                        ColumnDef::new(InvoiceItems::Weight)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvoiceItems::Purity).integer().not_null())
                    .col(
                        ColumnDef::new(InvoiceItems::RatePerGram)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceItems::MakingCharge)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoice_items_invoice")
                    .table(InvoiceItems::Table)
                    .col(InvoiceItems::InvoiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Purchases::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Purchases::PurchaseNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Purchases::VendorId).uuid().not_null())
                    .col(ColumnDef::new(Purchases::Status).string().not_null())
                    .col(ColumnDef::new(Purchases::PurchaseDate).date().not_null())
                    .col(
                        ColumnDef::new(Purchases::TotalAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Purchases::PaidAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Purchases::BalanceDue)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Purchases::PaidFromAccountId).uuid().null())
                    .col(
                        ColumnDef::new(Purchases::AdvanceGoldWeight)
                            .decimal_len(14, 3)
                            .null(),
                    )
                    .col(ColumnDef::new(Purchases::AdvanceGoldPurity).integer().null())
                    .col(
                        ColumnDef::new(Purchases::ExchangeGoldWeight)
                            .decimal_len(14, 3)
                            .null(),
                    )
                    .col(ColumnDef::new(Purchases::ExchangeGoldPurity).integer().null())
                    .col(ColumnDef::new(Purchases::Notes).string().null())
                    .col(ColumnDef::new(Purchases::Locked).boolean().not_null())
                    .col(
                        ColumnDef::new(Purchases::LockedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Purchases::LockedBy).string().null())
                    .col(
                        ColumnDef::new(Purchases::FinalizedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Purchases::FinalizedBy).uuid().null())
                    .col(ColumnDef::new(Purchases::FinalizedByName).string().null())
                    .col(
                        ColumnDef::new(Purchases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Purchases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchases_vendor")
                    .table(Purchases::Table)
                    .col(Purchases::VendorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseItems::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseItems::PurchaseId).uuid().not_null())
                    .col(
                        ColumnDef::new(PurchaseItems::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseItems::CategoryName).string().null())
                    .col(
                        ColumnDef::new(PurchaseItems::Qty)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseItems::WeightGrams)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseItems::EnteredPurity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_items_purchase")
                    .table(PurchaseItems::Table)
                    .col(PurchaseItems::PurchaseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockMovements::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockMovements::CategoryId).uuid().null())
                    .col(
                        ColumnDef::new(StockMovements::CategoryName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockMovements::MovementType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockMovements::QtyDelta)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockMovements::WeightDelta)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockMovements::Purity).integer().not_null())
                    .col(
                        ColumnDef::new(StockMovements::ReferenceType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockMovements::ReferenceId).uuid().not_null())
                    .col(
                        ColumnDef::new(StockMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stock_movements_reference")
                    .table(StockMovements::Table)
                    .col(StockMovements::ReferenceType)
                    .col(StockMovements::ReferenceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stock_movements_category")
                    .table(StockMovements::Table)
                    .col(StockMovements::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::AccountId).uuid().null())
                    .col(ColumnDef::new(Transactions::PartyId).uuid().null())
                    .col(ColumnDef::new(Transactions::Category).string().not_null())
                    .col(ColumnDef::new(Transactions::PaymentMode).string().null())
                    .col(ColumnDef::new(Transactions::ReferenceType).string().null())
                    .col(ColumnDef::new(Transactions::ReferenceId).uuid().null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_party")
                    .table(Transactions::Table)
                    .col(Transactions::PartyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_account")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_reference")
                    .table(Transactions::Table)
                    .col(Transactions::ReferenceType)
                    .col(Transactions::ReferenceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoldLedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GoldLedgerEntries::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GoldLedgerEntries::PartyId).uuid().not_null())
                    .col(
                        ColumnDef::new(GoldLedgerEntries::EntryType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoldLedgerEntries::Weight)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GoldLedgerEntries::Purity).integer().not_null())
                    .col(ColumnDef::new(GoldLedgerEntries::Purpose).string().not_null())
                    .col(
                        ColumnDef::new(GoldLedgerEntries::ReferenceType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoldLedgerEntries::ReferenceId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoldLedgerEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gold_ledger_party")
                    .table(GoldLedgerEntries::Table)
                    .col(GoldLedgerEntries::PartyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobCards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobCards::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(JobCards::JobCardNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(JobCards::CustomerName).string().not_null())
                    .col(ColumnDef::new(JobCards::PartyId).uuid().null())
                    .col(ColumnDef::new(JobCards::Status).string().not_null())
                    .col(ColumnDef::new(JobCards::Locked).boolean().not_null())
                    .col(
                        ColumnDef::new(JobCards::LockedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(JobCards::LockedBy).string().null())
                    .col(
                        ColumnDef::new(JobCards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobCards::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLog::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(AuditLog::Module).string().not_null())
                    .col(ColumnDef::new(AuditLog::RecordId).uuid().not_null())
                    .col(ColumnDef::new(AuditLog::Action).string().not_null())
                    .col(ColumnDef::new(AuditLog::ActorId).uuid().not_null())
                    .col(ColumnDef::new(AuditLog::ActorName).string().not_null())
                    .col(ColumnDef::new(AuditLog::Changes).json().not_null())
                    .col(
                        ColumnDef::new(AuditLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_log_record")
                    .table(AuditLog::Table)
                    .col(AuditLog::Module)
                    .col(AuditLog::RecordId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GoldLedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StockMovements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Purchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvoiceItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parties::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Parties {
    Table,
    Id,
    Name,
    PartyType,
    Phone,
    Address,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Name,
    OpeningBalance,
    CurrentBalance,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InventoryCategories {
    Table,
    Id,
    Name,
    NormalizedName,
    CurrentQty,
    CurrentWeight,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    InvoiceNumber,
    PartyId,
    WalkInName,
    JobCardId,
    Status,
    PaymentStatus,
    InvoiceDate,
    VatRate,
    Subtotal,
    VatAmount,
    GrandTotal,
    PaidAmount,
    BalanceDue,
    FinalizedAt,
    FinalizedBy,
    FinalizedByName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InvoiceItems {
    Table,
    Id,
    InvoiceId,
    Description,
    CategoryName,
    Qty,
    Weight,
    Purity,
    RatePerGram,
    MakingCharge,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Purchases {
    Table,
    Id,
    PurchaseNumber,
    VendorId,
    Status,
    PurchaseDate,
    TotalAmount,
    PaidAmount,
    BalanceDue,
    PaidFromAccountId,
    AdvanceGoldWeight,
    AdvanceGoldPurity,
    ExchangeGoldWeight,
    ExchangeGoldPurity,
    Notes,
    Locked,
    LockedAt,
    LockedBy,
    FinalizedAt,
    FinalizedBy,
    FinalizedByName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PurchaseItems {
    Table,
    Id,
    PurchaseId,
    Description,
    CategoryName,
    Qty,
    WeightGrams,
    EnteredPurity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StockMovements {
    Table,
    Id,
    CategoryId,
    CategoryName,
    MovementType,
    QtyDelta,
    WeightDelta,
    Purity,
    ReferenceType,
    ReferenceId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    TransactionNumber,
    TransactionType,
    Amount,
    AccountId,
    PartyId,
    Category,
    PaymentMode,
    ReferenceType,
    ReferenceId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GoldLedgerEntries {
    Table,
    Id,
    PartyId,
    EntryType,
    Weight,
    Purity,
    Purpose,
    ReferenceType,
    ReferenceId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JobCards {
    Table,
    Id,
    JobCardNumber,
    CustomerName,
    PartyId,
    Status,
    Locked,
    LockedAt,
    LockedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AuditLog {
    Table,
    Id,
    Module,
    RecordId,
    Action,
    ActorId,
    ActorName,
    Changes,
    CreatedAt,
}
