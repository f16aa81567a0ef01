//! Error types for the like service.
//!
//! This module defines the central `Error` enum, which captures every failure
//! the service can observe. It implements [`IntoResponse`] so handlers can
//! return it directly and have it rendered as a JSON `{"error": ...}` body with
//! the matching HTTP status.
//!
//! ## Error Cases
//! - `SourceUnavailable`: The remote token list could not be fetched or parsed.
//! - `EncodingFailed`: A request record could not be built or encrypted.
//! - `DecodeFailed`: An upstream response was not a valid profile record.
//! - `UpstreamRejected`: The game server answered with a non-200 status. Only
//!   ever observed inside the executor, never rendered.
//! - `Transport`: An upstream request failed before a status was received.
//! - `NoCredentials`: The token list was fetched but empty.
//! - `AccessDenied`: The shared access key did not match.
//! - `InvalidParameters`: Required query parameters were missing.
//! - `ProfileNotFound`: The profile lookup before dispatch failed.
//! - `ProfileUnavailable`: The profile lookup after dispatch failed.
//!
//! Response bodies only carry short fixed messages; the detailed `Display`
//! output is meant for logs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the like service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Token list fetch failed (network, status or malformed JSON).
    #[error("Token source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    /// Record construction or encryption failed.
    #[error("Encoding failed: {reason}")]
    EncodingFailed { reason: String },

    /// Upstream bytes were not a valid profile record.
    #[error("Decode failed: {reason}")]
    DecodeFailed { reason: String },

    /// The game server refused a request.
    #[error("Upstream rejected request with status {status}")]
    UpstreamRejected { status: u16 },

    /// Connection, TLS or body read failure talking to the game API.
    #[error("Upstream transport error: {reason}")]
    Transport { reason: String },

    /// The token list for the region was empty.
    #[error("No credentials available for region {region}")]
    NoCredentials { region: String },

    /// The caller did not present the configured access key.
    #[error("Access denied")]
    AccessDenied,

    /// Required query parameters were missing or empty.
    #[error("Invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    /// The profile could not be read before dispatching likes.
    #[error("Initial profile lookup failed")]
    ProfileNotFound,

    /// The profile could not be read after dispatching likes.
    #[error("Profile lookup after dispatch failed")]
    ProfileUnavailable,
}

impl Error {
    /// HTTP status this error is rendered with.
    pub const fn status(&self) -> StatusCode {
        match self {
            Error::AccessDenied => StatusCode::FORBIDDEN,
            Error::InvalidParameters { .. } => StatusCode::BAD_REQUEST,
            Error::ProfileNotFound => StatusCode::NOT_FOUND,
            Error::SourceUnavailable { .. }
            | Error::NoCredentials { .. }
            | Error::EncodingFailed { .. }
            | Error::DecodeFailed { .. }
            | Error::UpstreamRejected { .. }
            | Error::Transport { .. }
            | Error::ProfileUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Error::AccessDenied => "Access denied. Invalid or missing key.".to_string(),
            Error::InvalidParameters { reason } => reason.clone(),
            Error::ProfileNotFound => "Failed to retrieve initial player info. The UID might be \
                                       invalid or the server is down."
                .to_string(),
            Error::ProfileUnavailable => {
                "Failed to retrieve player info after sending likes.".to_string()
            }
            Error::SourceUnavailable { .. } | Error::NoCredentials { .. } => {
                "Could not load tokens for the server.".to_string()
            }
            Error::EncodingFailed { .. } => "Encryption of UID failed.".to_string(),
            Error::DecodeFailed { .. }
            | Error::UpstreamRejected { .. }
            | Error::Transport { .. } => {
                "An internal server error occurred.".to_string()
            }
        }
    }
}

impl From<prost::DecodeError> for Error {
    fn from(err: prost::DecodeError) -> Self {
        Error::DecodeFailed {
            reason: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_http_surface() {
        assert_eq!(Error::AccessDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::InvalidParameters {
                reason: "missing".into()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::ProfileNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::NoCredentials {
                region: "IND".into()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::EncodingFailed {
                reason: "bad uid".into()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn public_message_hides_internal_reason() {
        let err = Error::SourceUnavailable {
            reason: "dns error: raw.githubusercontent.com".into(),
        };
        let message = err.public_message();
        assert_eq!(message, "Could not load tokens for the server.");
        assert!(!message.contains("dns"));
    }
}
