//! Fetching single files and directory listings.
//!
//! Both go through GitHub's contents endpoint, which answers with an object
//! for a single entry and an array for a directory. The shape decides which
//! operation succeeds.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use markhub_protocol::{DirectoryEntry, FileContent};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::provider::{Provider, narrow};

#[derive(Debug, Deserialize)]
struct ContentPayload {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    sha: String,
    #[serde(default)]
    size: u64,
    content: Option<String>,
    encoding: Option<String>,
}

/// Fetches `path` from `owner/repo` and decodes it to text.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD.
///
/// # Errors
///
/// - [`Error::NotAFile`] if `path` is a directory, a symlink or submodule,
///   or a file GitHub returned without a body (e.g. too large).
/// - [`Error::Decode`] if the encoding is unknown or the body is not valid
///   base64.
/// - [`Error::Upstream`] if the request fails.
#[instrument(skip(provider), fields(owner = %owner, repo = %repo))]
pub async fn get_file_content<P: Provider>(
    provider: &P,
    owner: &str,
    repo: &str,
    path: &str,
) -> Result<FileContent> {
    let payload = provider.content(owner, repo, path).await?;
    if !payload.is_object() {
        debug!("contents response is not a single entry");
        return Err(not_a_file(path));
    }

    let file: ContentPayload = narrow(payload, "file content")?;
    if file.kind != "file" {
        debug!(kind = %file.kind, "contents entry is not a file");
        return Err(not_a_file(path));
    }
    let Some(encoded) = file.content.filter(|content| !content.is_empty()) else {
        debug!("file has no inline content");
        return Err(not_a_file(path));
    };

    let raw = decode(&encoded, file.encoding.as_deref()).map_err(|reason| Error::Decode {
        path: path.to_string(),
        reason,
    })?;
    debug!(bytes = raw.len(), "decoded file content");

    Ok(FileContent {
        path: path.to_string(),
        sha: file.sha,
        size: file.size,
        raw,
    })
}

/// Lists the immediate children of `path` in `owner/repo`.
///
/// An empty `path` lists the repository root.
///
/// # Errors
///
/// - [`Error::NotADirectory`] if `path` is a single entry.
/// - [`Error::Upstream`] if the request fails.
#[instrument(skip(provider), fields(owner = %owner, repo = %repo))]
pub async fn get_directory_contents<P: Provider>(
    provider: &P,
    owner: &str,
    repo: &str,
    path: &str,
) -> Result<Vec<DirectoryEntry>> {
    let payload = provider.content(owner, repo, path).await?;
    if !matches!(payload, Value::Array(_)) {
        return Err(Error::NotADirectory {
            path: path.to_string(),
        });
    }

    let entries: Vec<DirectoryEntry> = narrow(payload, "directory listing")?;
    debug!(count = entries.len(), "listed directory");
    Ok(entries)
}

fn not_a_file(path: &str) -> Error {
    Error::NotAFile {
        path: path.to_string(),
    }
}

/// Decodes a contents body according to GitHub's reported encoding.
fn decode(content: &str, encoding: Option<&str>) -> std::result::Result<String, String> {
    match encoding.unwrap_or("base64").to_ascii_lowercase().as_str() {
        "base64" => {
            // GitHub wraps base64 bodies with newlines.
            let compact: String = content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = STANDARD.decode(compact).map_err(|e| e.to_string())?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        "utf-8" | "utf8" => Ok(content.to_string()),
        other => Err(format!("unsupported encoding `{other}`")),
    }
}
