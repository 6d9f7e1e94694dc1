//! Error types for the discussion API client.

use thiserror::Error;

/// Errors returned by the API client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, TLS, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, if any.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured base URL could not be used.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ClientError>;
