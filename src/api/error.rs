//! Failure taxonomy for remote calls.

use thiserror::Error;

/// Errors returned by a [`super::RemoteService`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// A required field is missing or malformed.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The entity does not exist (anymore).
    #[error("Not found: {0}")]
    NotFound(String),

    /// No token, or the server rejected it.
    #[error("Not signed in: {0}")]
    Unauthorized(String),

    /// Signed in, but not allowed to touch this entity.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A unique field is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request never got a response.
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a 5xx.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Coarse classification used for user-facing presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Authorization,
    Conflict,
    Transport,
}

impl ApiError {
    /// Map an HTTP status and server message to an error variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 422 => ApiError::Validation(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            _ => ApiError::Server { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) | ApiError::Decode(_) => ErrorKind::Validation,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Unauthorized(_) | ApiError::Forbidden(_) => ErrorKind::Authorization,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Transport(_) | ApiError::Server { .. } => ErrorKind::Transport,
        }
    }

    /// Whether sending the same request again could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Server { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
