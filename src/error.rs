//! Error handling for the ApiBlaze dashboard client

use std::fmt;
use thiserror::Error;

/// Unified error type for the ApiBlaze dashboard client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The remote administrative API rejected the bearer credential.
    ///
    /// Retrying with the same credential will not succeed; the consuming
    /// application should terminate the session instead of offering a retry.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The remote administrative API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The initial team-scope load did not complete
    #[error("Bootstrap error: {0}")]
    Bootstrap(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new unauthorized error
    pub fn unauthorized<T: fmt::Display>(msg: T) -> Self {
        Error::Unauthorized(msg.to_string())
    }

    /// Create a new API error
    pub fn api<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new bootstrap error
    pub fn bootstrap<T: fmt::Display>(msg: T) -> Self {
        Error::Bootstrap(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Whether this error was caused by a rejected credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }
}
