//! HTTP error responses.
//!
//! Every failure is rendered as
//! `{"error": {"code": ..., "message": ..., "detail": ...}}`. The code is a
//! stable machine-readable string, the message is safe to show to users, and
//! the detail is the underlying error's `Display`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use markhub_github::Error as GitHubError;
use serde::Serialize;
use tracing::{error, warn};

/// An error returned by a handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required query parameter was absent or empty.
    #[error("{name} parameter required")]
    MissingParameter {
        /// Parameter name.
        name: &'static str,
    },

    /// The query string could not be parsed.
    #[error("invalid query string: {reason}")]
    InvalidQuery {
        /// Why parsing failed.
        reason: String,
    },

    /// A GitHub operation failed.
    #[error("{message}")]
    GitHub {
        /// What the handler was doing, e.g. "Failed to fetch repositories".
        message: &'static str,
        /// The underlying failure.
        #[source]
        source: GitHubError,
    },
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl ApiError {
    /// Wraps a GitHub error under a handler-specific message.
    pub fn github(message: &'static str) -> impl FnOnce(GitHubError) -> Self {
        move |source| Self::GitHub { message, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter { .. } | Self::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            Self::GitHub { source, .. } => match source {
                GitHubError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                GitHubError::Upstream {
                    status: Some(404), ..
                } => StatusCode::NOT_FOUND,
                GitHubError::NotAFile { .. } | GitHubError::NotADirectory { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                GitHubError::Upstream { .. }
                | GitHubError::Decode { .. }
                | GitHubError::UnexpectedResponse { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } | Self::InvalidQuery { .. } => "invalid_request",
            Self::GitHub { source, .. } => match source {
                GitHubError::Configuration(_) => "configuration_error",
                GitHubError::Upstream { status, .. } => match status {
                    Some(404) => "not_found",
                    Some(401 | 403) => "upstream_unauthorized",
                    _ => "upstream_error",
                },
                GitHubError::NotAFile { .. } => "not_a_file",
                GitHubError::NotADirectory { .. } => "not_a_directory",
                GitHubError::Decode { .. } | GitHubError::UnexpectedResponse { .. } => {
                    "invalid_upstream_response"
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::GitHub { source, .. } => Some(source.to_string()),
            _ => None,
        };

        if status.is_server_error() {
            error!(code = self.code(), detail = detail.as_deref(), "{}", self);
        } else {
            warn!(code = self.code(), detail = detail.as_deref(), "{}", self);
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
                detail: detail.as_deref(),
            },
        };
        (status, Json(body)).into_response()
    }
}
