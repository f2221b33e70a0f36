//! Error types for the monday crate

use thiserror::Error;

/// Errors from the monday.com client
#[derive(Debug, Error)]
pub enum MondayError {
    /// Network-level failure (unreachable host, TLS, body decode)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 2xx response whose payload carries a GraphQL error list
    #[error("monday.com query error: {0}")]
    Query(String),

    /// HTTP 401 - the credential was rejected and needs re-entry.
    /// The message is user-facing and surfaced verbatim.
    #[error("{0}")]
    Auth(String),

    /// HTTP 429 - the caller should back off. No retry happens here;
    /// the poll interval is the only backoff.
    #[error("{0}")]
    RateLimit(String),

    /// Any other non-2xx response
    #[error("unexpected response (status {status}): {message}")]
    Transport { status: u16, message: String },

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Client configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, MondayError>;
