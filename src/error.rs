//! Error types for the customer API client
//!
//! Provides unified error handling using thiserror. Errors are cloneable so
//! a single failed request can be handed to every coalesced caller.

use thiserror::Error;

// == Api Error Enum ==
/// Failure of a request made through the customer API client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Endpoint needs a bearer token and none is configured
    #[error("Not authenticated: {0} requires a token")]
    Unauthenticated(String),

    /// Request could not be sent or the connection failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status code
    #[error("Request to {path} failed with status {status}")]
    Status { path: String, status: u16 },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Server answered with `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the customer API client.
pub type Result<T> = std::result::Result<T, ApiError>;
