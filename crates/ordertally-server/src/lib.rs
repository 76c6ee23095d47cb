//! HTTP surface for order sheet analysis.

pub mod error;
pub mod handlers;
pub mod logging;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ordertally_core::{FactExtractor, TallyConfig};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<FactExtractor>,
    pub config: Arc<TallyConfig>,
}

impl AppState {
    pub fn new(config: TallyConfig) -> Self {
        Self {
            extractor: Arc::new(FactExtractor::new()),
            config: Arc::new(config),
        }
    }
}

/// Build the router with its middleware stack.
pub fn create_app(config: TallyConfig) -> Router {
    let body_limit = config.server.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/analyze", post(handlers::analyze::analyze))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(AppState::new(config))
}
