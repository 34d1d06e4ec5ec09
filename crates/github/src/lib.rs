//! GitHub access for markhub.
//!
//! This crate answers three questions about a GitHub account: which
//! repositories it can see, which markdown files a repository holds, and
//! what a given file says.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - [`GitHubClient`]: The octocrab-backed API client
//! - [`ClientRegistry`]: Lazily builds one shared client from a token
//! - [`list_repositories`]: Every repository visible to the token, paged
//! - [`list_markdown_files`]: Markdown blobs on a repository's default branch
//! - [`get_file_content`] and [`get_directory_contents`]: The contents API
//! - [`TtlCache`]: An in-memory cache for responses
//! - [`Error`]: Error types for GitHub operations
//!
//! The operations are generic over [`Provider`], the raw request surface.
//! [`GitHubClient`] is the production provider; with the `testing` feature,
//! `testing::FakeProvider` serves canned responses instead.
//!
//! # Authentication
//!
//! The token is read from `GITHUB_PAT` (or another configured variable) the
//! first time a client is needed, and held as a [`secrecy::SecretString`] so
//! it never ends up in logs.
//!
//! # Examples
//!
//! ```no_run
//! use markhub_github::{ClientRegistry, get_file_content, list_markdown_files};
//!
//! # async fn example() -> markhub_github::Result<()> {
//! let registry = ClientRegistry::from_env();
//! let client = registry.client().await?;
//!
//! for file in list_markdown_files(client.as_ref(), "rust-lang", "book").await? {
//!     let content = get_file_content(client.as_ref(), "rust-lang", "book", &file.path).await?;
//!     println!("{}: {} bytes", content.path, content.raw.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod content;
pub mod error;
pub mod provider;
pub mod registry;
pub mod repos;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod tree;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use client::GitHubClient;
pub use content::{get_directory_contents, get_file_content};
pub use error::{Error, Result};
pub use provider::Provider;
pub use registry::ClientRegistry;
pub use repos::{PAGE_SIZE, list_repositories};
pub use tree::list_markdown_files;
