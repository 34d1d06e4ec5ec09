//! Shared types for markhub.
//!
//! These plain values are what the GitHub layer produces and the HTTP layer
//! serializes. No provider-specific wrapper types appear here.
//!
//! - [`repository`]: [`RepositorySummary`]
//! - [`file`]: [`MarkdownFile`], [`FileContent`], [`DirectoryEntry`]

pub mod file;
pub mod repository;

pub use file::{DirectoryEntry, EntryKind, FileContent, MARKDOWN_EXTENSIONS, MarkdownFile};
pub use repository::RepositorySummary;
