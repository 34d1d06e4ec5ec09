//! File and directory values returned by content lookups.
//!
//! These are the narrowed shapes handed to callers. They are independent of
//! one another: callers join a [`MarkdownFile`] and its [`FileContent`] by
//! path.

use serde::{Deserialize, Serialize};

/// File extensions treated as markdown, compared case-insensitively.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];

/// A markdown file found in a repository tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownFile {
    /// Repository-relative path.
    pub path: String,
    /// Blob hash.
    pub sha: String,
    /// Size in bytes.
    pub size: u64,
    /// API URL of the blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MarkdownFile {
    /// Returns `true` if `path` ends with a markdown extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use markhub_protocol::MarkdownFile;
    ///
    /// assert!(MarkdownFile::is_markdown_path("docs/README.md"));
    /// assert!(MarkdownFile::is_markdown_path("pages/Index.MDX"));
    /// assert!(!MarkdownFile::is_markdown_path("src/main.rs"));
    /// assert!(!MarkdownFile::is_markdown_path("notes.markdown"));
    /// ```
    #[must_use]
    pub fn is_markdown_path(path: &str) -> bool {
        path.rsplit_once('.').is_some_and(|(_, ext)| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
    }
}

/// The decoded content of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Repository-relative path.
    pub path: String,
    /// Blob hash.
    pub sha: String,
    /// Size in bytes, as reported by the provider.
    pub size: u64,
    /// Decoded text.
    pub raw: String,
}

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symbolic link.
    Symlink,
    /// Git submodule.
    Submodule,
    /// Any type this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// An immediate child of a repository directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Entry name (last path segment).
    pub name: String,
    /// Repository-relative path.
    pub path: String,
    /// Entry type.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Git hash of the entry.
    pub sha: String,
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// API URL of the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
