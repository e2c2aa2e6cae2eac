//! realtime-crypto MCP server
//!
//! Serves the CoinCap lookup tools to an agent host over stdio.
//! Logs go to stderr; stdout carries MCP traffic only.

mod handlers;
mod server;
mod state;

use std::sync::Arc;

use anyhow::Context;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::ToolRegistry;
use crypto_tools::{tools::register_all, CoinCapClient, CoinCapConfig};

use crate::server::CryptoServer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CoinCapConfig::from_env().context("invalid CoinCap configuration")?;
    let client = Arc::new(
        CoinCapClient::from_config(&config).context("failed to build CoinCap client")?,
    );
    tracing::info!(
        base = %config.base_url,
        retry = config.retry,
        max_retries = config.max_retries,
        "CoinCap client ready"
    );

    let mut tools = ToolRegistry::new();
    register_all(&mut tools, &client);

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let service = CryptoServer::new(AppState::new(tools))
        .serve(stdio())
        .await
        .context("failed to start MCP server on stdio")?;

    tracing::info!("Realtime Crypto MCP Server running on stdio");

    tokio::select! {
        result = service.waiting() => {
            let reason = result?;
            tracing::info!(?reason, "Client disconnected, shutting down");
        }
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted, shutting down"),
    }

    Ok(())
}
