//! Billing Error Types
//!
//! Billing-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use accounts::AccountError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Billing-specific result type alias
pub type BillingResult<T> = Result<T, BillingError>;

/// Billing-specific error variants
#[derive(Debug, Error)]
pub enum BillingError {
    /// Webhook signature missing, malformed, or wrong; nothing is persisted
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Request or event body failed validation
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// An intent event referenced no known ledger entry
    #[error("No ledger entry for this payment intent")]
    LedgerEntryNotFound,

    /// Admin token missing or wrong
    #[error("Admin access denied")]
    AdminAccessDenied,

    /// Error raised while mutating the owning user
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Payment provider call failed
    #[error("Payment provider error: {0}")]
    Provider(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BillingError::InvalidSignature | BillingError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            BillingError::AdminAccessDenied => StatusCode::FORBIDDEN,
            BillingError::Account(err) => err.status_code(),
            // Not-found during reconciliation surfaces as 500 so the
            // provider retries once the intent row lands
            BillingError::LedgerEntryNotFound
            | BillingError::Provider(_)
            | BillingError::Database(_)
            | BillingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BillingError::InvalidSignature | BillingError::InvalidPayload(_) => {
                ErrorKind::BadRequest
            }
            BillingError::AdminAccessDenied => ErrorKind::Forbidden,
            BillingError::Account(err) => err.kind(),
            BillingError::Provider(_) => ErrorKind::BadGateway,
            BillingError::LedgerEntryNotFound
            | BillingError::Database(_)
            | BillingError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            BillingError::Database(e) => {
                tracing::error!(error = %e, "Billing database error");
            }
            BillingError::Provider(msg) => {
                tracing::error!(message = %msg, "Payment provider error");
            }
            BillingError::Internal(msg) => {
                tracing::error!(message = %msg, "Billing internal error");
            }
            BillingError::LedgerEntryNotFound => {
                tracing::warn!("Payment event matched no ledger entry");
            }
            _ => {
                tracing::debug!(error = %self, "Billing error");
            }
        }
    }
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        // Minimal JSON only; no internals cross this boundary
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
