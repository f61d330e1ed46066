//! Staging Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::CacheMiss;
use thiserror::Error;

pub type StagingResult<T> = Result<T, StagingError>;

#[derive(Debug, Error)]
pub enum StagingError {
    /// Batch expired, already committed, or never staged
    #[error("Staged data is no longer available")]
    CacheMiss(#[from] CacheMiss),

    /// Batch was staged by another user
    #[error("Staged data belongs to another user")]
    NotOwner,

    #[error("Batch contains no rows")]
    EmptyBatch,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StagingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StagingError::CacheMiss(_) => ErrorKind::Gone,
            StagingError::NotOwner => ErrorKind::Forbidden,
            StagingError::EmptyBatch => ErrorKind::BadRequest,
            StagingError::Database(_) | StagingError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Gone => StatusCode::GONE,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            StagingError::CacheMiss(_) => AppError::gone(self.to_string())
                .with_action("Upload the file again"),
            StagingError::NotOwner => AppError::forbidden(self.to_string()),
            StagingError::EmptyBatch => AppError::bad_request(self.to_string())
                .with_action("Upload a file with at least one row"),
            StagingError::Database(_) | StagingError::Internal(_) => {
                AppError::internal("Internal server error")
            }
        }
    }

    fn log(&self) {
        match self {
            StagingError::Database(e) => {
                tracing::error!(error = %e, "Staging database error");
            }
            StagingError::Internal(msg) => {
                tracing::error!(message = %msg, "Staging internal error");
            }
            StagingError::NotOwner => {
                tracing::warn!("Commit attempted by non-owner");
            }
            _ => {
                tracing::debug!(error = %self, "Staging request rejected");
            }
        }
    }
}

impl IntoResponse for StagingError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for StagingError {
    fn from(err: AppError) -> Self {
        StagingError::Internal(err.to_string())
    }
}
