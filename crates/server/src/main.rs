//! leadscout server entry point.
//!
//! Loads configuration and serves the lead harvesting HTTP API.
//! Logs are JSON on stderr.

use anyhow::Result;
use leadscout_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod error;
mod handlers;
mod pipelines;
mod routes;
mod server;
mod types;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!("Starting leadscout on {}", config.listen_addr);

    server::run(config).await
}
