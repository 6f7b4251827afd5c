//! Read-only HTTP status surface.

use crate::climate::{Controller, StatusReport};
use crate::error::{ControllerError, Result};
use axum::{Router, extract::State, response::Json, routing::get};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

/// Create the status router.
pub fn create_router(controller: Arc<Controller>) -> Router {
    Router::new()
        .route("/health-check", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(controller)
}

/// GET /health-check - connectivity, target temperature and every room's state
async fn health_check(State(controller): State<Arc<Controller>>) -> Json<StatusReport> {
    Json(controller.status().await)
}

/// Serve the status router until `shutdown` is cancelled.
pub async fn serve(
    bind: SocketAddr,
    controller: Arc<Controller>,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("[HTTP] Status endpoint listening on http://{}/health-check", bind);

    axum::serve(listener, create_router(controller))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ControllerError::Http(e.to_string()))
}
