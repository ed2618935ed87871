//! Error types for host operations.

use thiserror::Error;

// =============================================================================
// API Errors
// =============================================================================

/// Errors returned by a [`ChatHost`](crate::ChatHost) call.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The host is not connected to the platform.
    #[error("host is not connected")]
    NotConnected,

    /// The platform did not answer in time.
    #[error("API call timed out")]
    Timeout,

    /// The referenced object does not exist (or is no longer visible).
    #[error("object not found")]
    NotFound,

    /// The bot lacks permission for this action.
    #[error("missing permissions")]
    Forbidden,

    /// The host does not implement this operation.
    #[error("operation '{0}' is not supported by this host")]
    Unsupported(&'static str),

    /// The platform returned an error.
    #[error("API error ({code}): {message}")]
    Api {
        /// Platform error code.
        code: i64,
        /// Platform error message.
        message: String,
    },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Creates an [`ApiError::Other`] from any message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type for host operations.
pub type ApiResult<T> = Result<T, ApiError>;
