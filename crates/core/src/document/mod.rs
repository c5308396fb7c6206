//! Invoice and purchase documents.
//!
//! Documents are the only mutable things in the engine, and only while in
//! draft. Finalization turns them into immutable financial facts backed by
//! ledger entries.

pub mod totals;
pub mod types;

pub use totals::{InvoiceTotals, compute_invoice_totals, line_metal_value, line_total};
pub use types::{
    DocumentStatus, InvoiceDoc, LineItem, PaymentStatus, PurchaseDoc, PurchaseItem,
};
