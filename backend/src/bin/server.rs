//! vsight HTTP server binary.
//!
//! Serves the insight engine over REST, backed by the synthetic data provider
//! and an in-memory alert rule repository.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin vsight-server
//! VSIGHT_CONFIG=./vsight.toml PORT=3001 RUST_LOG=vsight_insights=debug cargo run --bin vsight-server
//! ```
//!
//! # Environment Variables
//!
//! - `VSIGHT_CONFIG`: config file path (default: search `vsight.toml`)
//! - `HOST` / `PORT`: bind address overrides (default: 0.0.0.0:8080)
//! - `REPOSITORY_TYPE`: repository backend (default: local)
//! - `CRON_SECRET`: bearer secret for `POST /v1/alerts/trigger`
//! - `RUST_LOG`: log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vsight_insights::config::AppConfig;
use vsight_insights::db::RepositoryFactory;
use vsight_insights::http::{create_router, AppState};
use vsight_insights::providers::SyntheticProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting vsight HTTP server");

    let config = AppConfig::load().context("Failed to load configuration")?;

    let repository = RepositoryFactory::from_settings(&config.repository)
        .context("Failed to create repository")?;
    info!("Repository initialized successfully");

    let provider = Arc::new(SyntheticProvider::with_salt(config.provider.salt.clone()));

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_addr()))?;

    let app = create_router(AppState::new(provider, repository, config));

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
