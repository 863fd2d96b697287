//! Verify Error Types
//!
//! KYC-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use accounts::AccountError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Verify-specific result type alias
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Verify-specific error variants
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Request or event body failed validation
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Configured webhook signature check failed; nothing is persisted
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// No user matches the delivered scan reference
    #[error("User not found for this scanRef")]
    UserNotFound,

    /// A verification session is already in flight for this user
    #[error("A verification session is already in progress")]
    SessionInFlight,

    /// The user is already verified; no new session may be started
    #[error("Identity verification already approved")]
    AlreadyApproved,

    /// Declared scan reference does not match the current session
    #[error("scanRef does not match the current verification session")]
    ScanRefMismatch,

    /// Error raised while mutating the owning user
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Identity provider call failed
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VerifyError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            VerifyError::InvalidPayload(_)
            | VerifyError::InvalidSignature
            | VerifyError::ScanRefMismatch => StatusCode::BAD_REQUEST,
            VerifyError::UserNotFound => StatusCode::NOT_FOUND,
            VerifyError::SessionInFlight | VerifyError::AlreadyApproved => StatusCode::CONFLICT,
            VerifyError::Account(err) => err.status_code(),
            VerifyError::Provider(_) | VerifyError::Database(_) | VerifyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::InvalidPayload(_)
            | VerifyError::InvalidSignature
            | VerifyError::ScanRefMismatch => ErrorKind::BadRequest,
            VerifyError::UserNotFound => ErrorKind::NotFound,
            VerifyError::SessionInFlight | VerifyError::AlreadyApproved => ErrorKind::Conflict,
            VerifyError::Account(err) => err.kind(),
            VerifyError::Provider(_) => ErrorKind::BadGateway,
            VerifyError::Database(_) | VerifyError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            VerifyError::Database(e) => {
                tracing::error!(error = %e, "Verify database error");
            }
            VerifyError::Provider(msg) => {
                tracing::error!(message = %msg, "Identity provider error");
            }
            VerifyError::Internal(msg) => {
                tracing::error!(message = %msg, "Verify internal error");
            }
            VerifyError::UserNotFound => {
                tracing::warn!("Identity event matched no user");
            }
            _ => {
                tracing::debug!(error = %self, "Verify error");
            }
        }
    }
}

impl From<VerifyError> for AppError {
    fn from(err: VerifyError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        // Minimal JSON only; no internals cross this boundary
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
