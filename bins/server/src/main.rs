//! Karat API Server
//!
//! Main entry point for the Karat backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use karat_api::{AppState, create_router};
use karat_db::connect;
use karat_shared::AppConfig;
use karat_shared::types::Purity;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "karat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Resolve the shop's valuation purity
    let valuation_purity = Purity::new(config.valuation.purity)
        .map_err(|message| anyhow::anyhow!("invalid valuation purity: {message}"))?;
    info!(purity = %valuation_purity, "Valuation purity configured");

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        valuation_purity,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
