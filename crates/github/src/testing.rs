//! In-memory [`Provider`] for tests.
//!
//! [`FakeProvider`] answers from canned JSON keyed by the same routes the
//! real client requests, and records every call so tests can assert on
//! request order and count. Unknown routes answer with a 404.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use markhub_config::DEFAULT_TOKEN_VAR;
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::provider::{Provider, routes};
use crate::registry::ClientRegistry;

/// A canned response.
#[derive(Debug, Clone)]
enum Canned {
    Ok(Value),
    Fail { status: u16, message: String },
}

#[derive(Debug, Default)]
struct State {
    repository_pages: Vec<Canned>,
    responses: HashMap<String, Canned>,
    calls: Vec<String>,
}

/// A cloneable fake GitHub. Clones share responses and the call log.
///
/// # Examples
///
/// ```
/// use markhub_github::testing::FakeProvider;
/// use serde_json::json;
///
/// let fake = FakeProvider::new()
///     .with_repository("acme", "docs", "main")
///     .with_ref("acme", "docs", "heads/main", "abc123")
///     .with_tree("acme", "docs", "abc123", json!([
///         {"path": "README.md", "type": "blob", "sha": "1", "size": 10},
///     ]));
/// assert!(fake.calls().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    state: Arc<Mutex<State>>,
}

impl FakeProvider {
    /// Creates a fake with no canned responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `pages` from `GET /user/repos`, page 1 first.
    ///
    /// Pages past the end answer with an empty list.
    #[must_use]
    pub fn with_repository_pages(self, pages: Vec<Vec<Value>>) -> Self {
        self.lock().repository_pages = pages
            .into_iter()
            .map(|items| Canned::Ok(Value::Array(items)))
            .collect();
        self
    }

    /// Makes repository page `page` (1-based) fail with `status`.
    #[must_use]
    pub fn with_failing_repository_page(self, page: u32, status: u16, message: &str) -> Self {
        {
            let mut state = self.lock();
            let index = page.saturating_sub(1) as usize;
            if state.repository_pages.len() <= index {
                state
                    .repository_pages
                    .resize(index + 1, Canned::Ok(Value::Array(Vec::new())));
            }
            state.repository_pages[index] = Canned::Fail {
                status,
                message: message.to_string(),
            };
        }
        self
    }

    /// Serves repository metadata with the given default branch.
    #[must_use]
    pub fn with_repository(self, owner: &str, repo: &str, default_branch: &str) -> Self {
        self.with_response(
            routes::repository(owner, repo),
            json!({
                "name": repo,
                "full_name": format!("{owner}/{repo}"),
                "default_branch": default_branch,
            }),
        )
    }

    /// Serves a git ref pointing at `sha`.
    #[must_use]
    pub fn with_ref(self, owner: &str, repo: &str, reference: &str, sha: &str) -> Self {
        self.with_response(
            routes::git_ref(owner, repo, reference),
            json!({
                "ref": format!("refs/{reference}"),
                "object": { "type": "commit", "sha": sha },
            }),
        )
    }

    /// Serves a tree whose `tree` array is `entries`.
    #[must_use]
    pub fn with_tree(self, owner: &str, repo: &str, sha: &str, entries: Value) -> Self {
        self.with_response(
            routes::tree(owner, repo, sha),
            json!({ "sha": sha, "tree": entries, "truncated": false }),
        )
    }

    /// Serves a single file from the contents endpoint, base64-encoded the
    /// way GitHub does it (wrapped at 60 columns).
    #[must_use]
    pub fn with_file(self, owner: &str, repo: &str, path: &str, sha: &str, text: &str) -> Self {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("\n");
        self.with_content(
            owner,
            repo,
            path,
            json!({
                "type": "file",
                "name": path.rsplit('/').next().unwrap_or(path),
                "path": path,
                "sha": sha,
                "size": text.len(),
                "encoding": "base64",
                "content": wrapped,
            }),
        )
    }

    /// Serves an arbitrary contents-endpoint body for `path`.
    #[must_use]
    pub fn with_content(self, owner: &str, repo: &str, path: &str, body: Value) -> Self {
        self.with_response(routes::contents(owner, repo, path), body)
    }

    /// Serves `body` for an exact route.
    #[must_use]
    pub fn with_response(self, route: String, body: Value) -> Self {
        self.lock().responses.insert(route, Canned::Ok(body));
        self
    }

    /// Makes an exact route fail with `status`.
    #[must_use]
    pub fn with_failure(self, route: String, status: u16, message: &str) -> Self {
        self.lock().responses.insert(
            route,
            Canned::Fail {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    /// Returns every request made so far, as `route` or `route?query`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Returns a registry that hands out this fake, authenticated with a
    /// dummy token.
    #[must_use]
    pub fn into_registry(self) -> ClientRegistry<FakeProvider> {
        let env = HashMap::from([(DEFAULT_TOKEN_VAR.to_string(), "test-token".to_string())]);
        ClientRegistry::with_connector(env, DEFAULT_TOKEN_VAR, move |_token| Ok(self.clone()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(&self, call: String, route: &str) -> Result<Value> {
        let mut state = self.lock();
        state.calls.push(call);
        let canned = state.responses.get(route).cloned();
        answer(canned)
    }
}

fn answer(canned: Option<Canned>) -> Result<Value> {
    match canned {
        Some(Canned::Ok(body)) => Ok(body),
        Some(Canned::Fail { status, message }) => Err(Error::Upstream {
            status: Some(status),
            message,
        }),
        None => Err(Error::Upstream {
            status: Some(404),
            message: "Not Found".to_string(),
        }),
    }
}

impl Provider for FakeProvider {
    async fn list_repositories_page(&self, per_page: u8, page: u32) -> Result<Value> {
        let mut state = self.lock();
        state.calls.push(format!(
            "{}?per_page={per_page}&page={page}&sort=updated&direction=desc",
            routes::user_repositories()
        ));
        let index = page.saturating_sub(1) as usize;
        let canned = state
            .repository_pages
            .get(index)
            .cloned()
            .unwrap_or(Canned::Ok(Value::Array(Vec::new())));
        answer(Some(canned))
    }

    async fn repository(&self, owner: &str, repo: &str) -> Result<Value> {
        let route = routes::repository(owner, repo);
        self.respond(route.clone(), &route)
    }

    async fn git_ref(&self, owner: &str, repo: &str, reference: &str) -> Result<Value> {
        let route = routes::git_ref(owner, repo, reference);
        self.respond(route.clone(), &route)
    }

    async fn tree(&self, owner: &str, repo: &str, tree_sha: &str, recursive: bool) -> Result<Value> {
        let route = routes::tree(owner, repo, tree_sha);
        let call = if recursive {
            format!("{route}?recursive=1")
        } else {
            route.clone()
        };
        self.respond(call, &route)
    }

    async fn content(&self, owner: &str, repo: &str, path: &str) -> Result<Value> {
        let route = routes::contents(owner, repo, path);
        self.respond(route.clone(), &route)
    }
}
