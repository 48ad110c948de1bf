//! # Ad-Marketplace Node Runtime
//!
//! Entry point: configuration, storage, wallet, HTTP.

use std::sync::Arc;

use ad_node::adapters::HttpWalletClient;
use ad_node::container::{open_store, SharedClock, SharedWallet};
use ad_node::{build_router, AdNode, AppState, NodeConfig};
use anyhow::{Context, Result};
use shared_types::SystemTimeSource;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = NodeConfig::from_env().context("Failed to read configuration")?;
    config.validate().context("Invalid configuration")?;
    let addr = config.http.addr()?;

    info!("===========================================");
    info!("  Ad-Marketplace Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let store = open_store(&config.storage).context("Failed to open storage")?;
    let wallet: SharedWallet =
        Arc::new(HttpWalletClient::new(&config.wallet).context("Failed to create wallet client")?);
    let clock: SharedClock = Arc::new(SystemTimeSource);
    info!(url = %config.wallet.url, "Wallet client configured");

    let http_config = config.http.clone();
    let node = AdNode::build(config, store, wallet, clock)?;
    let router = build_router(AppState::new(&node), &http_config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, "Node is running. Press Ctrl+C to stop.");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Initiating graceful shutdown...");
        })
        .await?;

    info!("Shutdown complete");
    Ok(())
}
