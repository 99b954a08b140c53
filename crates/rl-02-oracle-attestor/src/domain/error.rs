//! Attestor error types.
//!
//! [`ApiError`] is what a client sees: an HTTP status and a `{ "error": .. }`
//! body. [`AttestorError`] covers everything that goes wrong inside the
//! service (configuration, key handling, signing, serving).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rl_01_signature_verification::SignatureError;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::ConfigError;

/// Client-facing error messages.
pub mod messages {
    pub const INVALID_TOKEN_ID: &str = "Invalid tokenId";
    pub const MISSING_DESCRIPTION: &str = "Missing asset description";
    pub const INVALID_TTL: &str = "Invalid ttl";
    pub const SIGNING_FAILED: &str = "Failed to sign valuation";
}

/// Client-facing API error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 with the given reason
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// The asset id in the path is not a base-10 `uint256`.
    pub fn invalid_token_id() -> Self {
        Self::bad_request(messages::INVALID_TOKEN_ID)
    }

    /// The POST body has no usable description.
    pub fn missing_description() -> Self {
        Self::bad_request(messages::MISSING_DESCRIPTION)
    }

    /// `ttl` is zero, non-numeric or above the configured maximum.
    pub fn invalid_ttl() -> Self {
        Self::bad_request(messages::INVALID_TTL)
    }

    /// 500 for an unexpected internal failure. Details go to the log, not the client.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, messages::SIGNING_FAILED)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// Wire shape of an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<AttestorError> for ApiError {
    fn from(e: AttestorError) -> Self {
        tracing::error!(error = %e, "attestation failed");
        ApiError::internal()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Attestor-level errors (internal use)
#[derive(Debug, thiserror::Error)]
pub enum AttestorError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The signing key could not be parsed
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// Signing the attestation failed
    #[error("signing failed: {0}")]
    Signing(#[from] SignatureError),

    /// The valuation source could not produce a value
    #[error("valuation unavailable: {0}")]
    Valuation(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server terminated with an I/O error
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
