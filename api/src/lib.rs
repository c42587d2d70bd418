use std::{env, sync::Arc};

pub mod core;
mod error_handler;
mod middleware_layer;
pub mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};
use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        export::export_route::export_document, index::index_route::index_document,
        query::query_route::query_documents, root_route::root,
    },
};

const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

/// Builds the HTTP router over an already wired [`AppState`].
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/index", post(index_document))
        .route("/query", post(query_documents))
        .route("/export", post(export_document))
        .layer(axum::middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Wires state from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.into());

    let state = Arc::new(AppState::from_env().await?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
