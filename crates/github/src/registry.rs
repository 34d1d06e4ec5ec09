//! Lazily constructed, shared GitHub client.
//!
//! A [`ClientRegistry`] resolves the token and builds the client on the
//! first call to [`ClientRegistry::client`], then hands out the same
//! [`Arc`] forever after. Initialization goes through a
//! [`tokio::sync::OnceCell`], so concurrent first callers wait for one
//! construction instead of racing to build several.

use std::fmt;
use std::sync::Arc;

use markhub_config::credential::{self, ConfigSource, DEFAULT_TOKEN_VAR, ProcessEnv};
use secrecy::SecretString;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::client::GitHubClient;
use crate::error::{Error, Result};

type Connector<P> = Box<dyn Fn(SecretString) -> Result<P> + Send + Sync>;

/// Holds the process-wide client.
///
/// # Examples
///
/// ```no_run
/// use markhub_github::{ClientRegistry, list_repositories};
///
/// # async fn example() -> markhub_github::Result<()> {
/// let registry = ClientRegistry::from_env();
/// let client = registry.client().await?;
/// let repos = list_repositories(client.as_ref()).await?;
/// # Ok(())
/// # }
/// ```
pub struct ClientRegistry<P = GitHubClient> {
    source: Box<dyn ConfigSource>,
    token_var: String,
    connect: Connector<P>,
    client: OnceCell<Arc<P>>,
}

impl ClientRegistry<GitHubClient> {
    /// Creates a registry reading `GITHUB_PAT` from the process environment
    /// and talking to `api.github.com`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ProcessEnv, DEFAULT_TOKEN_VAR, None)
    }

    /// Creates a registry reading `token_var` from `source`.
    ///
    /// `api_base_url` overrides the default GitHub API endpoint.
    #[must_use]
    pub fn new(
        source: impl ConfigSource + 'static,
        token_var: impl Into<String>,
        api_base_url: Option<String>,
    ) -> Self {
        Self::with_connector(source, token_var, move |token| {
            GitHubClient::new(token, api_base_url.as_deref())
        })
    }
}

impl<P> ClientRegistry<P> {
    /// Creates a registry that builds clients with `connect`.
    pub fn with_connector(
        source: impl ConfigSource + 'static,
        token_var: impl Into<String>,
        connect: impl Fn(SecretString) -> Result<P> + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Box::new(source),
            token_var: token_var.into(),
            connect: Box::new(connect),
            client: OnceCell::new(),
        }
    }

    /// Returns the shared client, building it on first use.
    ///
    /// The token is resolved only on the call that builds the client. A
    /// failed build leaves the registry empty, so a later call tries again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the token is missing, or the
    /// connector's error if the client cannot be built. No request is made
    /// to GitHub either way.
    #[instrument(skip(self), fields(token_var = %self.token_var))]
    pub async fn client(&self) -> Result<Arc<P>> {
        let client = self
            .client
            .get_or_try_init(|| async {
                debug!("constructing GitHub client");
                let token = credential::resolve(self.source.as_ref(), &self.token_var)?;
                let client = (self.connect)(token)?;
                Ok::<_, Error>(Arc::new(client))
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Returns `true` once a client has been built.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// Name of the variable the token is read from.
    #[must_use]
    pub fn token_var(&self) -> &str {
        &self.token_var
    }
}

impl<P> fmt::Debug for ClientRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("token_var", &self.token_var)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use markhub_config::ConfigError;

    use crate::testing::FakeProvider;

    /// Counts how often the token is looked up.
    #[derive(Debug, Default)]
    struct CountingEnv {
        token: Option<String>,
        reads: AtomicUsize,
    }

    impl ConfigSource for CountingEnv {
        fn var(&self, _name: &str) -> Option<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.token.clone()
        }
    }

    fn counting(token: Option<&str>) -> Arc<CountingEnv> {
        Arc::new(CountingEnv {
            token: token.map(str::to_string),
            reads: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn client_is_memoized() {
        let env = counting(Some("ghp_test"));
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let registry = ClientRegistry::with_connector(Arc::clone(&env), "GITHUB_PAT", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(FakeProvider::new())
        });

        let first = registry.client().await.unwrap();
        let second = registry.client().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(env.reads.load(Ordering::SeqCst), 1);
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(registry.is_initialized());
    }

    #[tokio::test]
    async fn real_client_is_memoized() {
        let env = HashMap::from([("GITHUB_PAT".to_string(), "ghp_fake".to_string())]);
        let registry = ClientRegistry::new(env, "GITHUB_PAT", None);

        let first = registry.client().await.unwrap();
        let second = registry.client().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn concurrent_first_calls_build_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let registry = Arc::new(ClientRegistry::with_connector(
            counting(Some("ghp_test")),
            "GITHUB_PAT",
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(FakeProvider::new())
            },
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.client().await.unwrap() })
            })
            .collect();

        let mut clients = Vec::new();
        for handle in handles {
            clients.push(handle.await.unwrap());
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(clients.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn missing_token_fails_before_connecting() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let registry = ClientRegistry::with_connector(counting(None), "GITHUB_PAT", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(FakeProvider::new())
        });

        let err = registry.client().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Configuration(ConfigError::MissingValue { ref name }) if name == "GITHUB_PAT"
        ));
        assert_eq!(builds.load(Ordering::SeqCst), 0);
        assert!(!registry.is_initialized());
    }

    #[tokio::test]
    async fn failed_build_is_retried_on_next_call() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let registry = ClientRegistry::with_connector(counting(Some("ghp_test")), "GITHUB_PAT", move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::Upstream {
                    status: None,
                    message: "builder failed".to_string(),
                })
            } else {
                Ok(FakeProvider::new())
            }
        });

        assert!(registry.client().await.is_err());
        assert!(registry.client().await.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn debug_does_not_expose_source() {
        let registry = FakeProvider::new().into_registry();
        let debug = format!("{registry:?}");
        assert!(debug.contains("GITHUB_PAT"));
        assert!(!debug.contains("test-token"));
    }
}
