//! Account Error Types
//!
//! Account-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// No user for the given subject / id / scan reference
    #[error("User not found")]
    UserNotFound,

    /// Request carried no verified subject header
    #[error("Missing authenticated subject")]
    MissingSubject,

    /// Admin token missing or wrong
    #[error("Admin access denied")]
    AdminAccessDenied,

    /// Administrative override tried to set ACTIVE directly
    #[error("ACTIVE is reachable only through the activation policy")]
    DirectActivation,

    /// Unknown status code in an override request
    #[error("Unknown account status: {0}")]
    UnknownStatus(String),

    /// Optimistic-concurrency retries exhausted
    #[error("Concurrent update conflict on user record")]
    ActivationConflict,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::UserNotFound => StatusCode::NOT_FOUND,
            AccountError::MissingSubject => StatusCode::UNAUTHORIZED,
            AccountError::AdminAccessDenied => StatusCode::FORBIDDEN,
            AccountError::DirectActivation | AccountError::UnknownStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            AccountError::ActivationConflict
            | AccountError::Database(_)
            | AccountError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::UserNotFound => ErrorKind::NotFound,
            AccountError::MissingSubject => ErrorKind::Unauthorized,
            AccountError::AdminAccessDenied => ErrorKind::Forbidden,
            AccountError::DirectActivation | AccountError::UnknownStatus(_) => {
                ErrorKind::BadRequest
            }
            AccountError::ActivationConflict
            | AccountError::Database(_)
            | AccountError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::ActivationConflict => {
                tracing::error!("Activation CAS retries exhausted");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        // Minimal JSON only; no internals cross this boundary
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
