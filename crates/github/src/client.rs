//! GitHub API client implementation.
//!
//! [`GitHubClient`] wraps an authenticated [`Octocrab`] instance and
//! implements [`Provider`] on top of octocrab's generic `get`.

use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::provider::{Provider, routes};

/// Query parameters for `GET /user/repos`.
#[derive(Debug, Serialize)]
struct ListRepositoriesParams {
    per_page: u8,
    page: u32,
    sort: &'static str,
    direction: &'static str,
}

/// Query parameters for `GET /repos/{owner}/{repo}/git/trees/{sha}`.
#[derive(Debug, Serialize)]
struct TreeParams {
    recursive: u8,
}

/// Authenticated GitHub API client.
///
/// # Security
///
/// The token is handed to octocrab at construction and never stored here,
/// so it cannot leak through `Debug` output.
///
/// # Examples
///
/// ```no_run
/// use secrecy::SecretString;
/// use markhub_github::GitHubClient;
///
/// # fn example() -> markhub_github::Result<()> {
/// let token = SecretString::from("ghp_your_token".to_string());
/// let client = GitHubClient::new(token, None)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GitHubClient {
    /// The underlying octocrab client.
    inner: Octocrab,
}

impl GitHubClient {
    /// Creates a new client authenticated with `token`.
    ///
    /// `api_base_url` overrides `https://api.github.com`, e.g. for GitHub
    /// Enterprise. No request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or octocrab fails to
    /// initialize.
    #[instrument(skip(token))]
    pub fn new(token: SecretString, api_base_url: Option<&str>) -> Result<Self> {
        debug!("creating authenticated GitHub client");
        let mut builder = Octocrab::builder().personal_token(token.expose_secret());
        if let Some(url) = api_base_url {
            builder = builder.base_uri(url)?;
        }
        let inner = builder.build().map_err(Error::from)?;

        Ok(Self { inner })
    }

    /// Returns a reference to the underlying octocrab client.
    #[must_use]
    pub fn inner(&self) -> &Octocrab {
        &self.inner
    }

    async fn get_json<P>(&self, route: &str, params: Option<&P>) -> Result<Value>
    where
        P: Serialize + Sync + ?Sized,
    {
        debug!(route, "GET");
        self.inner.get(route, params).await.map_err(Error::from)
    }
}

impl Provider for GitHubClient {
    #[instrument(skip(self))]
    async fn list_repositories_page(&self, per_page: u8, page: u32) -> Result<Value> {
        let params = ListRepositoriesParams {
            per_page,
            page,
            sort: "updated",
            direction: "desc",
        };
        self.get_json(routes::user_repositories(), Some(&params))
            .await
    }

    #[instrument(skip(self))]
    async fn repository(&self, owner: &str, repo: &str) -> Result<Value> {
        self.get_json(&routes::repository(owner, repo), None::<&()>)
            .await
    }

    #[instrument(skip(self))]
    async fn git_ref(&self, owner: &str, repo: &str, reference: &str) -> Result<Value> {
        self.get_json(&routes::git_ref(owner, repo, reference), None::<&()>)
            .await
    }

    #[instrument(skip(self))]
    async fn tree(&self, owner: &str, repo: &str, tree_sha: &str, recursive: bool) -> Result<Value> {
        let route = routes::tree(owner, repo, tree_sha);
        if recursive {
            self.get_json(&route, Some(&TreeParams { recursive: 1 })).await
        } else {
            self.get_json(&route, None::<&()>).await
        }
    }

    #[instrument(skip(self))]
    async fn content(&self, owner: &str, repo: &str, path: &str) -> Result<Value> {
        self.get_json(&routes::contents(owner, repo, path), None::<&()>)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_authenticated_client() {
        // Construction does not contact GitHub, so a fake token is fine.
        let token = SecretString::from("fake_token_for_testing".to_string());
        let client = GitHubClient::new(token, None).unwrap();
        let _octocrab: &Octocrab = client.inner();
    }

    #[tokio::test]
    async fn new_with_enterprise_base_url() {
        let token = SecretString::from("fake_token_for_testing".to_string());
        let client = GitHubClient::new(token, Some("https://github.example.com/api/v3/"));
        assert!(client.is_ok());
    }

    #[test]
    fn list_params_request_newest_first() {
        let params = ListRepositoriesParams {
            per_page: 100,
            page: 2,
            sort: "updated",
            direction: "desc",
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({
                "per_page": 100,
                "page": 2,
                "sort": "updated",
                "direction": "desc",
            })
        );
    }
}
