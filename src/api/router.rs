// Route table and layers for the detection API

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use super::handlers;
use super::middleware::log_request;
use super::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/classify", post(handlers::classify))
        .route("/health", get(handlers::health))
        .route("/languages", get(handlers::languages))
        .layer(axum::middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
