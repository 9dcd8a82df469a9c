//! HTTP surface of the detector: batch classification plus small
//! discovery endpoints.

mod error;
mod handlers;
mod middleware;
mod router;
mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::{AppState, SharedState};

use std::sync::Arc;
use tracing::info;

use crate::services::{Detector, ServerConfig};

/// Serve until Ctrl-C.
pub async fn serve(
    server: &ServerConfig,
    detector: Arc<Detector>,
    max_concurrency: usize,
) -> std::io::Result<()> {
    let state = Arc::new(AppState {
        detector,
        max_concurrency,
    });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    info!(address = %listener.local_addr()?, "server.listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("server.shutdown_requested");
        })
        .await
}
