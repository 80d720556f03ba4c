//! Error types for tracker lookups.

use thiserror::Error;

/// Errors that can occur while talking to a tracker instance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The instance settings do not form a valid URL.
    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Network request failed.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LookupError {
    /// Whether the server rejected the configured credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
