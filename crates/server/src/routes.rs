//! Route definitions for the leadscout HTTP API.

use axum::Router;
use axum::http::Method;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};

/// Create the API router with all routes mounted under `/api/v1`.
pub fn create_router(state: AppState, cors_enabled: bool) -> Router {
    let api_v1 = Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .route("/backlinks", post(handlers::backlinks))
        .route("/scrape", post(handlers::scrape))
        .route("/crawl", post(handlers::crawl))
        .route("/related-websites", post(handlers::related_websites))
        .route("/search-leads", post(handlers::search_leads))
        .with_state(state);

    let mut app = Router::new().nest("/api/v1", api_v1);

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .allow_origin(Any);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}
