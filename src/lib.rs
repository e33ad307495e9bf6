//! CSV Summary - price/volume statistics over uploaded CSV files
//!
//! Accepts a CSV upload with `price`, `volume` and an optional `timestamp`
//! column and answers with descriptive statistics, daily/hourly mean-price
//! trends and the consecutive price difference series as JSON.

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod services;
pub mod state;

use api::SummaryServer;
use config::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csv_summary=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the summary server until Ctrl+C
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting CSV Summary v{}...", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env()?;
    let mut server = SummaryServer::new(config);
    server.start().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.shutdown().await;
    Ok(())
}
