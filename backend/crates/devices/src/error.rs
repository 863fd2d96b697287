//! Devices Error Types
//!
//! Device-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use accounts::AccountError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Device-specific result type alias
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Device-specific error variants
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No device with this id belongs to the requesting user
    #[error("ASIC not found")]
    DeviceNotFound,

    /// Request carried an unrecognized status label
    #[error("Invalid ASIC status: {0}")]
    InvalidStatus(String),

    /// Error raised while resolving the requesting user
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeviceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeviceError::DeviceNotFound => StatusCode::NOT_FOUND,
            DeviceError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            DeviceError::Account(err) => err.status_code(),
            DeviceError::Database(_) | DeviceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeviceError::DeviceNotFound => ErrorKind::NotFound,
            DeviceError::InvalidStatus(_) => ErrorKind::BadRequest,
            DeviceError::Account(err) => err.kind(),
            DeviceError::Database(_) | DeviceError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            DeviceError::Database(e) => {
                tracing::error!(error = %e, "Devices database error");
            }
            DeviceError::Internal(msg) => {
                tracing::error!(message = %msg, "Devices internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Devices error");
            }
        }
    }
}

impl From<DeviceError> for AppError {
    fn from(err: DeviceError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for DeviceError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
