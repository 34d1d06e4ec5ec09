//! Finding markdown files in a repository.
//!
//! The walk resolves the default branch to a commit, fetches that commit's
//! tree recursively, and keeps the markdown blobs.
//!
//! # Limitations
//!
//! GitHub caps recursive tree responses and sets `truncated` when it does.
//! A truncated tree is returned as-is; files past the cap are missing.

use markhub_protocol::MarkdownFile;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::provider::{Provider, narrow};

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct RefPayload {
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct TreePayload {
    #[serde(default)]
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    sha: Option<String>,
    size: Option<u64>,
    url: Option<String>,
}

/// Lists the markdown files on `owner/repo`'s default branch.
///
/// Files are returned in tree order. Only blobs whose path ends with `.md`
/// or `.mdx` (any case) are kept; entries without a path are skipped.
///
/// # Errors
///
/// Returns [`Error::Upstream`](crate::Error::Upstream) if the repository,
/// its default branch, or the tree cannot be fetched.
#[instrument(skip(provider), fields(owner = %owner, repo = %repo))]
pub async fn list_markdown_files<P: Provider>(
    provider: &P,
    owner: &str,
    repo: &str,
) -> Result<Vec<MarkdownFile>> {
    let repository: RepositoryPayload =
        narrow(provider.repository(owner, repo).await?, "repository")?;
    let reference = format!("heads/{}", repository.default_branch);
    debug!(%reference, "resolving default branch");

    let head: RefPayload = narrow(provider.git_ref(owner, repo, &reference).await?, "git ref")?;
    let commit_sha = head.object.sha;

    let tree: TreePayload = narrow(
        provider.tree(owner, repo, &commit_sha, true).await?,
        "git tree",
    )?;
    if tree.truncated {
        warn!(%commit_sha, "tree listing was truncated by GitHub; some files are missing");
    }

    let total = tree.tree.len();
    let files = markdown_entries(tree.tree);
    debug!(total, markdown = files.len(), "walked tree");
    Ok(files)
}

fn markdown_entries(entries: Vec<TreeEntry>) -> Vec<MarkdownFile> {
    entries
        .into_iter()
        .filter(|entry| entry.kind.as_deref() == Some("blob"))
        .filter_map(|entry| {
            let path = entry
                .path
                .filter(|path| MarkdownFile::is_markdown_path(path))?;
            Some(MarkdownFile {
                path,
                sha: entry.sha.unwrap_or_default(),
                size: entry.size.unwrap_or(0),
                url: entry.url,
            })
        })
        .collect()
}
