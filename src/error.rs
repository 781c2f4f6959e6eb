//! Error types for newsdeck.

use thiserror::Error;

/// Errors raised inside the library. Source adapters and the summarizer
/// never hand these to their callers; they log them and degrade instead.
#[derive(Error, Debug)]
pub enum NewsError {
    /// Transport failure talking to a remote API.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    /// The API answered but reported an error in its body.
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not match the expected schema.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Durable storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NewsError>;
