// src/web/mod.rs
// HTTP layer for the triage service

pub mod api;
pub mod error;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::web::state::AppState;

/// Patient payloads are small; anything larger is not a triage request
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the web server router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/example", get(api::example))
        .route("/recommend", post(api::recommend))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
