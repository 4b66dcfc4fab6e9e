//! HTTP server bootstrap.
//!
//! Wires the store, fetcher, search engine and LLM client into the pipelines
//! and serves the API until Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use leadscout_client::{ChatClient, DuckDuckGo, FetchConfig, HttpFetcher};
use leadscout_core::{AppConfig, Store};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::handlers::AppState;
use crate::pipelines::Pipelines;
use crate::routes::create_router;

/// Open the store and build the shared application state.
pub async fn build_state(config: AppConfig) -> Result<AppState> {
    let store = Store::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?;

    match store.purge_expired_responses().await {
        Ok(0) => {}
        Ok(n) => info!("purged {} expired cached responses", n),
        Err(e) => warn!(code = e.code(), "failed to purge expired responses: {}", e),
    }

    if let Err(e) = config.require_llm_api_key() {
        warn!("{}; analyze and related-websites will fail until it is set", e);
    }

    let fetcher = Arc::new(HttpFetcher::new(FetchConfig::from(&config)).context("Failed to build HTTP client")?);
    let search = Arc::new(DuckDuckGo::from_config(fetcher.clone(), &config));
    let suggester = Arc::new(ChatClient::from_config(&config).context("Failed to build LLM client")?);

    let pipelines = Pipelines::new(Arc::new(config), fetcher, search, suggester, Some(store.clone()));
    Ok(AppState { pipelines: Arc::new(pipelines), leads: Arc::new(store) })
}

/// Run the HTTP server until Ctrl-C.
pub async fn run(config: AppConfig) -> Result<()> {
    let addr: SocketAddr = config.listen_addr.parse().context("Invalid HTTP listen address")?;

    let state = build_state(config).await?;
    let cors_enabled = state.pipelines.config().cors_enabled;
    let app = create_router(state, cors_enabled);

    let listener = TcpListener::bind(&addr).await.context("Failed to bind HTTP server")?;
    info!("leadscout listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for shutdown signal: {}", e);
            }
            info!("HTTP server shutting down");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_state_without_llm_key() {
        let dir = std::env::temp_dir().join(format!("leadscout-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = AppConfig { db_path: dir.join("state.sqlite"), llm_api_key: None, ..Default::default() };

        let state = build_state(config).await.unwrap();
        assert_eq!(state.pipelines.config().site_limit, 5);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_default_listen_addr_parses() {
        let addr: SocketAddr = AppConfig::default().listen_addr.parse().unwrap();
        assert_eq!(addr.port(), 5001);
    }
}
