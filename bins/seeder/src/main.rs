//! Development fixture seeder for Karat.
//!
//! Seeds a couple of parties, an account, inventory categories, and a
//! draft invoice/purchase pair for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal_macros::dec;

use karat_core::party::PartyType;
use karat_db::repositories::invoices::{CreateInvoiceInput, LineItemInput};
use karat_db::repositories::parties::CreatePartyInput;
use karat_db::repositories::purchases::{CreatePurchaseInput, PurchaseItemInput};
use karat_db::{
    AccountRepository, InventoryRepository, InvoiceRepository, PartyRepository, PurchaseRepository,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = karat_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding parties...");
    let parties = PartyRepository::new(db.clone());
    let customer = parties
        .create(CreatePartyInput {
            name: "Ravi Kumar".to_string(),
            party_type: PartyType::Customer,
            phone: Some("+971-50-0000001".to_string()),
            address: None,
        })
        .await
        .expect("seed customer");
    let vendor = parties
        .create(CreatePartyInput {
            name: "Bullion House LLC".to_string(),
            party_type: PartyType::Vendor,
            phone: Some("+971-50-0000002".to_string()),
            address: None,
        })
        .await
        .expect("seed vendor");

    println!("Seeding account...");
    let account = AccountRepository::new(db.clone())
        .create("Shop Cash", dec!(50000.00))
        .await
        .expect("seed account");

    println!("Seeding categories...");
    let inventory = InventoryRepository::new(db.clone());
    for name in ["Gold Bangles", "Gold Chains", "Rings", "Raw Gold"] {
        inventory.create_category(name).await.expect("seed category");
    }

    println!("Seeding a draft invoice...");
    InvoiceRepository::new(db.clone())
        .create(CreateInvoiceInput {
            party_id: Some(customer.id),
            walk_in_name: None,
            job_card_id: None,
            invoice_date: Utc::now().date_naive(),
            vat_rate: dec!(5),
            lines: vec![LineItemInput {
                description: "22k bangle".to_string(),
                category_name: Some("Gold Bangles".to_string()),
                qty: dec!(1),
                weight: dec!(20.000),
                purity: 916,
                rate_per_gram: dec!(50.00),
                making_charge: dec!(100.00),
            }],
        })
        .await
        .expect("seed draft invoice");

    println!("Seeding a draft purchase...");
    PurchaseRepository::new(db.clone())
        .create(CreatePurchaseInput {
            vendor_id: vendor.id,
            purchase_date: Utc::now().date_naive(),
            items: vec![PurchaseItemInput {
                description: "old gold lot".to_string(),
                category_name: Some("Raw Gold".to_string()),
                qty: dec!(1),
                weight_grams: dec!(100.000),
                entered_purity: 999,
            }],
            total_amount: dec!(5000.00),
            paid_amount: dec!(1000.00),
            paid_from_account_id: Some(account.id),
            advance_gold_weight: None,
            advance_gold_purity: None,
            exchange_gold_weight: None,
            exchange_gold_purity: None,
            notes: Some("demo fixture".to_string()),
        })
        .await
        .expect("seed draft purchase");

    println!("Seeding complete!");
}
