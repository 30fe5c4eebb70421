//! Error types for the user store
//!
//! `StoreError` is the typed outcome of the sharded store. `ApiError` is what
//! the HTTP layer turns into a JSON response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::domain::{PasswordError, ValidationError};
use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Outcome of a sharded store operation that did not succeed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// `create` on a key that is already present
    #[error("record already exists")]
    AlreadyExists,

    /// `update` or `delete` on a key that is absent
    #[error("record not found")]
    NotFound,

    /// The operation context was cancelled before the call
    #[error("operation cancelled")]
    Cancelled,

    /// The operation context deadline had already passed
    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

impl StoreError {
    /// True for both explicit cancellation and an expired deadline.
    ///
    /// Either way the store performed no work, so retrying with a fresh
    /// context is always safe.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StoreError::Cancelled | StoreError::DeadlineExceeded)
    }
}

/// Result type for sharded store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == API Error Enum ==
/// Unified error type for the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or incomplete request data
    #[error("{0}")]
    InvalidRequest(String),

    /// Request was well formed but the domain rejected it
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A user with the same email already exists
    #[error("user already exists")]
    Conflict,

    /// No user with the given email
    #[error("user not found")]
    NotFound,

    /// The request deadline passed or the server is shutting down
    #[error("request timed out")]
    Timeout,

    /// Server-side failure; details are logged, not returned
    #[error("internal server error")]
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists => ApiError::Conflict,
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Cancelled | StoreError::DeadlineExceeded => ApiError::Timeout,
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Invalid(err) => ApiError::Validation(err),
            PasswordError::Hashing(err) => {
                error!(error = %err, "password hashing failed");
                ApiError::Internal
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP layer.
pub type Result<T> = std::result::Result<T, ApiError>;
