//! Client error types.

use thiserror::Error;

/// Client error type.
///
/// Transport failures are normalized into [`Error::Timeout`] and
/// [`Error::NetworkUnreachable`]. A response that arrived is never turned
/// into either; the typed API reports it as [`Error::Http`] with the
/// original status.
#[derive(Debug, Error)]
pub enum Error {
    /// The request did not complete within the configured timeout.
    #[error("Request timeout. Please try again.")]
    Timeout,

    /// No response was received at all.
    #[error("Network error. Please check if the server is running at {base_url}")]
    NetworkUnreachable {
        /// Configured base address, for diagnosing a misconfigured endpoint.
        base_url: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Http {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, if the server sent one.
        message: Option<String>,
    },

    /// The request was cancelled before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// A required field was missing; no request was sent.
    #[error("{0} is required")]
    Validation(&'static str),

    /// Any other transport failure (request building, body decoding).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session storage could not be read or written.
    #[error("Session store error: {0}")]
    Store(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the server in its error body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status() == Some(401)
    }

    /// Check if this is an authorization (forbidden) error.
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// True for failures where no response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Timeout | Error::NetworkUnreachable { .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body sent by the backend.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}
