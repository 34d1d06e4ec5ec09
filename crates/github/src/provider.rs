//! The seam between markhub's operations and the GitHub REST API.
//!
//! [`Provider`] exposes the five raw calls markhub needs. Responses are
//! untyped JSON; the operation modules narrow them into the shapes from
//! `markhub_protocol` with [`narrow`], so no provider wrapper types leak out
//! of this crate.

use std::future::Future;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Characters left unescaped in a single path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Read-only access to the GitHub endpoints markhub relies on.
///
/// Implemented by [`GitHubClient`](crate::GitHubClient). Every call either
/// returns the decoded JSON body or an [`Error::Upstream`].
pub trait Provider: Send + Sync {
    /// `GET /user/repos`, sorted by last update, newest first.
    fn list_repositories_page(
        &self,
        per_page: u8,
        page: u32,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// `GET /repos/{owner}/{repo}`.
    fn repository(&self, owner: &str, repo: &str) -> impl Future<Output = Result<Value>> + Send;

    /// `GET /repos/{owner}/{repo}/git/ref/{reference}`, e.g. `heads/main`.
    fn git_ref(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// `GET /repos/{owner}/{repo}/git/trees/{tree_sha}`.
    fn tree(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
        recursive: bool,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// `GET /repos/{owner}/{repo}/contents/{path}`.
    ///
    /// The body is an object for a single entry and an array for a directory.
    fn content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> impl Future<Output = Result<Value>> + Send;
}

/// Deserializes a raw payload into `T`, naming `context` on failure.
pub(crate) fn narrow<T: DeserializeOwned>(payload: Value, context: &str) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| Error::UnexpectedResponse {
        context: context.to_string(),
        source,
    })
}

/// Route builders for the endpoints above.
///
/// Owner, repository and sha are encoded as single segments. Paths and refs
/// keep their `/` separators; empty segments are dropped.
pub mod routes {
    use super::*;

    /// `/user/repos`.
    #[must_use]
    pub fn user_repositories() -> &'static str {
        "/user/repos"
    }

    /// `/repos/{owner}/{repo}`.
    #[must_use]
    pub fn repository(owner: &str, repo: &str) -> String {
        format!("/repos/{}/{}", segment(owner), segment(repo))
    }

    /// `/repos/{owner}/{repo}/git/ref/{reference}`.
    #[must_use]
    pub fn git_ref(owner: &str, repo: &str, reference: &str) -> String {
        format!("{}/git/ref/{}", repository(owner, repo), path(reference))
    }

    /// `/repos/{owner}/{repo}/git/trees/{sha}`.
    #[must_use]
    pub fn tree(owner: &str, repo: &str, sha: &str) -> String {
        format!("{}/git/trees/{}", repository(owner, repo), segment(sha))
    }

    /// `/repos/{owner}/{repo}/contents/{path}`, or `.../contents` for the root.
    #[must_use]
    pub fn contents(owner: &str, repo: &str, file_path: &str) -> String {
        let encoded = path(file_path);
        if encoded.is_empty() {
            format!("{}/contents", repository(owner, repo))
        } else {
            format!("{}/contents/{encoded}", repository(owner, repo))
        }
    }

    fn segment(value: &str) -> String {
        utf8_percent_encode(value, SEGMENT).to_string()
    }

    fn path(value: &str) -> String {
        value
            .split('/')
            .filter(|part| !part.is_empty())
            .map(segment)
            .collect::<Vec<_>>()
            .join("/")
    }
}
