//! Auth Error Types
//!
//! Every authentication failure is reported to clients as the same 401 body.
//! The concrete variant is only written to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message shown for every authentication failure
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";

#[derive(Debug, Error)]
pub enum AuthError {
    /// No user with the given id or name
    #[error("Unknown user")]
    UnknownUser,

    /// No outstanding nonce for the user (never issued, consumed, or superseded)
    #[error("No outstanding challenge")]
    InvalidChallenge,

    /// The outstanding nonce outlived its TTL
    #[error("Challenge expired")]
    ChallengeExpired,

    /// Proof did not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token failed signature, expiry, kind or revocation checks
    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        if self.is_auth_failure() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UnknownUser
            | AuthError::InvalidChallenge
            | AuthError::ChallengeExpired
            | AuthError::InvalidCredentials
            | AuthError::InvalidToken => ErrorKind::Unauthorized,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// True for the failures that collapse into the uniform 401.
    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    /// Convert to AppError with the client-facing (non-revealing) message
    pub fn to_app_error(&self) -> AppError {
        if self.is_auth_failure() {
            AppError::unauthorized(AUTH_FAILED_MESSAGE)
        } else {
            AppError::internal("Internal server error")
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken => {
                tracing::debug!("Rejected token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth failure");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
