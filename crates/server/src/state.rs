//! Shared server state.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use markhub_github::{ClientRegistry, GitHubClient, Provider, Result, TtlCache};
use serde_json::Value;
use tracing::debug;

/// State shared by every handler.
///
/// Owns the client registry and, when enabled, a cache of successful
/// response bodies keyed by route and query.
pub struct AppState<P = GitHubClient> {
    registry: ClientRegistry<P>,
    cache: Option<ResponseCache>,
}

#[derive(Debug)]
struct ResponseCache {
    bodies: TtlCache<Value>,
    ttl: Duration,
}

impl<P: Provider> AppState<P> {
    /// Creates state without a response cache.
    #[must_use]
    pub fn new(registry: ClientRegistry<P>) -> Self {
        Self {
            registry,
            cache: None,
        }
    }

    /// Caches successful response bodies for `ttl`.
    ///
    /// A zero `ttl` leaves caching off.
    #[must_use]
    pub fn with_cache(mut self, ttl: Duration) -> Self {
        self.cache = (!ttl.is_zero()).then(|| ResponseCache {
            bodies: TtlCache::new(),
            ttl,
        });
        self
    }

    /// The client registry.
    #[must_use]
    pub fn registry(&self) -> &ClientRegistry<P> {
        &self.registry
    }

    /// Returns the shared client, building it on first use.
    ///
    /// # Errors
    ///
    /// See [`ClientRegistry::client`].
    pub async fn client(&self) -> Result<Arc<P>> {
        self.registry.client().await
    }

    /// Returns `true` if response caching is on.
    #[must_use]
    pub fn caches_responses(&self) -> bool {
        self.cache.is_some()
    }

    pub(crate) fn cached(&self, key: &str) -> Option<Value> {
        let body = self.cache.as_ref()?.bodies.get(key)?;
        debug!(key, "serving cached response");
        Some(body)
    }

    pub(crate) fn store(&self, key: String, body: &Value) {
        if let Some(cache) = &self.cache {
            cache.bodies.set(key, body.clone(), cache.ttl);
        }
    }
}

impl<P> fmt::Debug for AppState<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .finish()
    }
}
