//! Error types exposed by the Bitbucket API client.

use http::StatusCode;
use thiserror::Error;

use super::models::ErrorResponse;

/// Errors surfaced while talking to the Bitbucket REST API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BitbucketError {
    /// Username or API key was not configured.
    #[error("Bitbucket authentication not configured")]
    MissingCredentials,

    /// The HTTP client could not be constructed.
    #[error("failed to configure Bitbucket HTTP client: {message}")]
    Client {
        /// Builder error detail.
        message: String,
    },

    /// Bitbucket answered with a non-success status code.
    #[error("{status} for url: {url}")]
    Status {
        /// HTTP status returned by Bitbucket.
        status: StatusCode,
        /// Final URL of the request.
        url: String,
        /// Raw response body, kept for error-message extraction.
        body: String,
    },

    /// Networking failed before a response arrived.
    #[error("network error talking to Bitbucket: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected Bitbucket response: {message}")]
    Decode {
        /// Deserialisation error detail.
        message: String,
    },
}

impl BitbucketError {
    /// Returns the HTTP status when the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when Bitbucket answered `404 Not Found`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Extracts `error.message` from a Bitbucket error body, if present.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .map(|response| response.error.message)
            .filter(|message| !message.is_empty())
    }
}
