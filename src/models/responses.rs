//! Response DTOs for the restaurant API
//!
//! The API answers either with a `{success, data, message}` envelope or with
//! the bare payload.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A decoded API response, as stored in the request cache.
///
/// The cache keeps whatever was decoded; interpreting `success` is left to
/// the reader via [`ApiResponse::into_data`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Envelope {
        success: bool,
        data: Option<T>,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(T),
}

impl<T> ApiResponse<T> {
    /// Extracts the payload, turning `success: false` into an error.
    pub fn into_data(self, path: &str) -> Result<T, ApiError> {
        match self {
            ApiResponse::Envelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ApiResponse::Envelope {
                success: true,
                data: None,
                ..
            } => Err(ApiError::Decode(format!("{} returned no data", path))),
            ApiResponse::Envelope {
                success: false,
                message,
                ..
            } => Err(ApiError::Rejected(
                message.unwrap_or_else(|| format!("{} was not successful", path)),
            )),
            ApiResponse::Bare(data) => Ok(data),
        }
    }

    /// Checks the success flag only, for commands whose payload is ignored.
    pub fn ensure_success(self, path: &str) -> Result<(), ApiError> {
        match self {
            ApiResponse::Envelope {
                success: false,
                message,
                ..
            } => Err(ApiError::Rejected(
                message.unwrap_or_else(|| format!("{} was not successful", path)),
            )),
            _ => Ok(()),
        }
    }
}
