//! Error types for Patient Access client operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Primary error type for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The sign-in endpoint accepted the request but returned no usable token.
    #[error("bad credentials")]
    BadCredentials,
    /// The server answered with a non-2xx status.
    #[error("bad HTTP status code: {status}")]
    BadStatusCode {
        /// Status returned by the server.
        status: StatusCode,
    },
    /// The response body was not the expected JSON shape.
    #[error("failed to decode {operation} response")]
    Decoding {
        /// Operation identifier.
        operation: &'static str,
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// The token expiry was not a valid RFC 3339 timestamp.
    #[error("invalid token expiry timestamp")]
    ExpiryTimestamp {
        /// Timestamp payload returned by the server.
        value: String,
        /// Source parse error.
        source: chrono::ParseError,
    },
    /// The relative request path could not be parsed.
    #[error("malformed request path '{path}': {reason}")]
    MalformedPath {
        /// Path supplied by the caller.
        path: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The request body could not be serialised.
    #[error("failed to encode request body")]
    Encoding {
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// The configured base URL is unusable.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl {
        /// Base URL supplied at construction.
        value: String,
        /// Parse or validation failure detail.
        reason: String,
    },
    /// The configured user agent is not a valid header value.
    #[error("invalid user agent '{value}'")]
    InvalidUserAgent {
        /// User agent supplied at construction.
        value: String,
    },
    /// The HTTP transport refused to assemble the request.
    #[error("failed to build request")]
    InvalidRequest {
        /// Source transport error.
        source: reqwest::Error,
    },
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    ClientBuild {
        /// Source transport error.
        source: reqwest::Error,
    },
    /// Sending the request or reading the response failed.
    #[error("request to {operation} failed")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Source transport error.
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Whether the failure came from an unexpected response body.
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::Decoding { .. } | Self::ExpiryTimestamp { .. })
    }
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;
