//! HTTP API for markhub.
//!
//! Exposes the GitHub operations from `markhub_github` as JSON endpoints:
//!
//! | Route | Query |
//! |-------|-------|
//! | `GET /api/github/repos` | |
//! | `GET /api/github/files` | `owner`, `repo` |
//! | `GET /api/github/content` | `owner`, `repo`, `path` |
//! | `GET /api/github/directory` | `owner`, `repo`, optional `path` |
//! | `GET /health` | |
//!
//! Failures are rendered by [`ApiError`].

pub mod error;
pub mod handlers;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use markhub_github::Provider;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use error::ApiError;
pub use state::AppState;

/// Builds the router over `state`.
pub fn router<P: Provider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/github/repos", get(handlers::repositories::<P>))
        .route("/api/github/files", get(handlers::markdown_files::<P>))
        .route("/api/github/content", get(handlers::file_content::<P>))
        .route("/api/github/directory", get(handlers::directory::<P>))
        .with_state(Arc::new(state))
}

/// Serves `router` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("markhub listening on http://{addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C.
///
/// If the signal handler cannot be installed, never resolves.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
