//! markhub - browse the markdown files in your GitHub repositories over HTTP.
//!
//! Reads configuration, builds the GitHub client once up front so a missing
//! token fails at startup, and serves the API until Ctrl-C.

mod logging;

use anyhow::Context;
use markhub_config::{Config, ProcessEnv};
use markhub_github::ClientRegistry;
use markhub_server::AppState;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;

    let config = Config::load(&ProcessEnv).context("failed to load configuration")?;
    info!(?config, "loaded configuration");

    let registry = ClientRegistry::new(
        ProcessEnv,
        config.token_var.clone(),
        config.api_base_url.clone(),
    );
    registry
        .client()
        .await
        .with_context(|| format!("failed to create GitHub client from {}", config.token_var))?;

    let mut state = AppState::new(registry);
    if let Some(ttl) = config.cache_ttl() {
        info!(ttl_secs = ttl.as_secs(), "response cache enabled");
        state = state.with_cache(ttl);
    }

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    markhub_server::serve(
        listener,
        markhub_server::router(state),
        markhub_server::shutdown_signal(),
    )
    .await
    .context("server error")
}
