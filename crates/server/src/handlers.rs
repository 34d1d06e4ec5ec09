//! Route handlers.
//!
//! Each handler validates its query, asks the registry for the shared
//! client, runs one GitHub operation and wraps the result in a JSON body.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use markhub_github::{
    Provider, get_directory_contents, get_file_content, list_markdown_files, list_repositories,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// `Cache-Control` value sent with every successful GitHub response.
pub const CACHE_CONTROL: &str = "public, max-age=300";

/// Query parameters accepted by the GitHub routes.
#[derive(Debug, Default, Deserialize)]
pub struct RepoQuery {
    /// Repository owner.
    pub owner: Option<String>,
    /// Repository name.
    pub repo: Option<String>,
    /// Path inside the repository.
    pub path: Option<String>,
}

impl RepoQuery {
    fn owner(&self) -> Result<&str, ApiError> {
        required(self.owner.as_deref(), "owner")
    }

    fn repo(&self) -> Result<&str, ApiError> {
        required(self.repo.as_deref(), "repo")
    }

    fn path(&self) -> Result<&str, ApiError> {
        required(self.path.as_deref(), "path")
    }
}

type Handled = Result<Response, ApiError>;
type SharedState<P> = State<Arc<AppState<P>>>;

/// `GET /health`.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/github/repos`.
#[instrument(skip_all)]
pub async fn repositories<P: Provider>(State(state): SharedState<P>) -> Handled {
    const FAILED: &str = "Failed to fetch repositories";
    let key = "repos".to_string();
    if let Some(body) = state.cached(&key) {
        return Ok(success(body));
    }

    let client = state.client().await.map_err(ApiError::github(FAILED))?;
    let repositories = list_repositories(client.as_ref())
        .await
        .map_err(ApiError::github(FAILED))?;

    let body = json!({
        "count": repositories.len(),
        "repositories": repositories,
    });
    state.store(key, &body);
    Ok(success(body))
}

/// `GET /api/github/files?owner&repo`.
#[instrument(skip_all)]
pub async fn markdown_files<P: Provider>(
    State(state): SharedState<P>,
    query: Result<Query<RepoQuery>, QueryRejection>,
) -> Handled {
    const FAILED: &str = "Failed to fetch markdown files";
    let Query(query) = query.map_err(invalid_query)?;
    let owner = query.owner()?;
    let repo = query.repo()?;

    let key = format!("files:{owner}/{repo}");
    if let Some(body) = state.cached(&key) {
        return Ok(success(body));
    }

    let client = state.client().await.map_err(ApiError::github(FAILED))?;
    let files = list_markdown_files(client.as_ref(), owner, repo)
        .await
        .map_err(ApiError::github(FAILED))?;

    let body = json!({
        "owner": owner,
        "repo": repo,
        "count": files.len(),
        "files": files,
    });
    state.store(key, &body);
    Ok(success(body))
}

/// `GET /api/github/content?owner&repo&path`.
#[instrument(skip_all)]
pub async fn file_content<P: Provider>(
    State(state): SharedState<P>,
    query: Result<Query<RepoQuery>, QueryRejection>,
) -> Handled {
    const FAILED: &str = "Failed to fetch file content";
    let Query(query) = query.map_err(invalid_query)?;
    let owner = query.owner()?;
    let repo = query.repo()?;
    let path = query.path()?;

    let key = format!("content:{owner}/{repo}:{path}");
    if let Some(body) = state.cached(&key) {
        return Ok(success(body));
    }

    let client = state.client().await.map_err(ApiError::github(FAILED))?;
    let file = get_file_content(client.as_ref(), owner, repo, path)
        .await
        .map_err(ApiError::github(FAILED))?;

    let body = json!({
        "owner": owner,
        "repo": repo,
        "path": file.path,
        "sha": file.sha,
        "size": file.size,
        "raw": file.raw,
    });
    state.store(key, &body);
    Ok(success(body))
}

/// `GET /api/github/directory?owner&repo[&path]`.
///
/// Without `path`, lists the repository root.
#[instrument(skip_all)]
pub async fn directory<P: Provider>(
    State(state): SharedState<P>,
    query: Result<Query<RepoQuery>, QueryRejection>,
) -> Handled {
    const FAILED: &str = "Failed to fetch directory contents";
    let Query(query) = query.map_err(invalid_query)?;
    let owner = query.owner()?;
    let repo = query.repo()?;
    let path = query.path.as_deref().unwrap_or_default();

    let key = format!("directory:{owner}/{repo}:{path}");
    if let Some(body) = state.cached(&key) {
        return Ok(success(body));
    }

    let client = state.client().await.map_err(ApiError::github(FAILED))?;
    let entries = get_directory_contents(client.as_ref(), owner, repo, path)
        .await
        .map_err(ApiError::github(FAILED))?;

    let body = json!({
        "owner": owner,
        "repo": repo,
        "path": path,
        "count": entries.len(),
        "entries": entries,
    });
    state.store(key, &body);
    Ok(success(body))
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ApiError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::MissingParameter { name })
}

fn invalid_query(rejection: QueryRejection) -> ApiError {
    ApiError::InvalidQuery {
        reason: rejection.body_text(),
    }
}

fn success(body: Value) -> Response {
    ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use axum::http::StatusCode;
    use markhub_github::ClientRegistry;
    use markhub_github::testing::FakeProvider;

    fn state(fake: &FakeProvider) -> State<Arc<AppState<FakeProvider>>> {
        State(Arc::new(AppState::new(fake.clone().into_registry())))
    }

    fn query(owner: Option<&str>, repo: Option<&str>, path: Option<&str>) -> Result<Query<RepoQuery>, QueryRejection> {
        Ok(Query(RepoQuery {
            owner: owner.map(str::to_string),
            repo: repo.map(str::to_string),
            path: path.map(str::to_string),
        }))
    }

    async fn body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = health().await;
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn repositories_body_and_cache_header() {
        let fake = FakeProvider::new().with_repository_pages(vec![vec![json!({
            "id": 1, "name": "docs", "full_name": "acme/docs", "private": true,
        })]]);

        let response = repositories(state(&fake)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], CACHE_CONTROL);
        assert_eq!(
            body(response).await,
            json!({
                "repositories": [{"id": 1, "name": "docs", "full_name": "acme/docs", "private": true}],
                "count": 1,
            })
        );
    }

    #[tokio::test]
    async fn files_requires_owner_then_repo() {
        let fake = FakeProvider::new();

        let err = markdown_files(state(&fake), query(None, Some("docs"), None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "owner parameter required");

        let err = markdown_files(state(&fake), query(Some("acme"), Some(""), None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "repo parameter required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn files_body_lists_markdown() {
        let fake = FakeProvider::new()
            .with_repository("acme", "docs", "main")
            .with_ref("acme", "docs", "heads/main", "c1")
            .with_tree(
                "acme",
                "docs",
                "c1",
                json!([
                    {"path": "README.md", "type": "blob", "sha": "a", "size": 3},
                    {"path": "src/lib.rs", "type": "blob", "sha": "b", "size": 4},
                ]),
            );

        let response = markdown_files(state(&fake), query(Some("acme"), Some("docs"), None))
            .await
            .unwrap();

        assert_eq!(
            body(response).await,
            json!({
                "owner": "acme",
                "repo": "docs",
                "files": [{"path": "README.md", "sha": "a", "size": 3}],
                "count": 1,
            })
        );
    }

    #[tokio::test]
    async fn content_requires_path() {
        let fake = FakeProvider::new();

        let err = file_content(state(&fake), query(Some("acme"), Some("docs"), None))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "path parameter required");
    }

    #[tokio::test]
    async fn content_body_flattens_file() {
        let fake = FakeProvider::new().with_file("acme", "docs", "a.md", "s1", "# Hi\n");

        let response = file_content(state(&fake), query(Some("acme"), Some("docs"), Some("a.md")))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::CACHE_CONTROL], CACHE_CONTROL);
        assert_eq!(
            body(response).await,
            json!({
                "owner": "acme",
                "repo": "docs",
                "path": "a.md",
                "sha": "s1",
                "size": 5,
                "raw": "# Hi\n",
            })
        );
    }

    #[tokio::test]
    async fn content_of_directory_is_unprocessable() {
        let fake = FakeProvider::new().with_content("acme", "docs", "guide", json!([]));

        let err = file_content(state(&fake), query(Some("acme"), Some("docs"), Some("guide")))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "not_a_file");
        assert_eq!(err.to_string(), "Failed to fetch file content");
    }

    #[tokio::test]
    async fn directory_defaults_to_root() {
        let fake = FakeProvider::new().with_content(
            "acme",
            "docs",
            "",
            json!([{"name": "README.md", "path": "README.md", "type": "file", "sha": "1", "size": 2}]),
        );

        let response = directory(state(&fake), query(Some("acme"), Some("docs"), None))
            .await
            .unwrap();

        let body = body(response).await;
        assert_eq!(body["path"], "");
        assert_eq!(body["count"], 1);
        assert_eq!(body["entries"][0]["type"], "file");
    }

    #[tokio::test]
    async fn missing_secret_is_a_configuration_error() {
        let registry = ClientRegistry::with_connector(
            HashMap::<String, String>::new(),
            "GITHUB_PAT",
            |_| Ok(FakeProvider::new()),
        );
        let state = State(Arc::new(AppState::new(registry)));

        let err = repositories(state).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "configuration_error");
    }

    #[tokio::test]
    async fn cached_bodies_skip_github() {
        let fake = FakeProvider::new().with_file("acme", "docs", "a.md", "s1", "hello");
        let state = State(Arc::new(
            AppState::new(fake.clone().into_registry()).with_cache(Duration::from_secs(60)),
        ));

        for _ in 0..3 {
            let response = file_content(
                state.clone(),
                query(Some("acme"), Some("docs"), Some("a.md")),
            )
            .await
            .unwrap();
            assert_eq!(body(response).await["raw"], "hello");
        }

        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let fake = FakeProvider::new();
        let state = State(Arc::new(
            AppState::new(fake.clone().into_registry()).with_cache(Duration::from_secs(60)),
        ));

        for _ in 0..2 {
            let err = file_content(state.clone(), query(Some("acme"), Some("docs"), Some("x.md")))
                .await
                .unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
        }

        assert_eq!(fake.calls().len(), 2);
    }

    #[test]
    fn zero_ttl_disables_cache() {
        let state = AppState::new(FakeProvider::new().into_registry()).with_cache(Duration::ZERO);
        assert!(!state.caches_responses());
    }
}
