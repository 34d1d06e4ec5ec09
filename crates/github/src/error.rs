//! Error types for GitHub operations.
//!
//! Every failure surfaces to the caller unchanged in kind. Nothing here is
//! retried.

use markhub_config::ConfigError;

/// Errors that can occur while talking to GitHub.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client could not be configured (e.g. the token is missing).
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A call to the GitHub API failed.
    ///
    /// Covers network failures, non-2xx responses and rate limiting.
    #[error("GitHub API error{}: {message}", format_status(*.status))]
    Upstream {
        /// HTTP status reported by GitHub, if a response was received.
        status: Option<u16>,
        /// GitHub's error message, or the transport error.
        message: String,
    },

    /// A file was requested but the path is a directory or has no content.
    #[error("not a file: {path}")]
    NotAFile {
        /// The requested path.
        path: String,
    },

    /// A directory was requested but the path is a single entry.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The requested path.
        path: String,
    },

    /// File content could not be decoded.
    #[error("failed to decode {path}: {reason}")]
    Decode {
        /// The requested path.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// A response did not have the expected shape.
    #[error("unexpected GitHub response for {context}: {source}")]
    UnexpectedResponse {
        /// Which payload was being read.
        context: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Returns the upstream HTTP status, if this is an [`Error::Upstream`]
    /// carrying one.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                Self::Upstream {
                    status: Some(status),
                    message: source.message,
                }
            }
            other => Self::Upstream {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

fn format_status(status: Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}

/// A specialized Result type for GitHub operations.
pub type Result<T> = std::result::Result<T, Error>;
