//! Authentication Boundary
//!
//! The token issuer is an external collaborator: tokens are verified
//! upstream and the resulting opaque subject is injected as a request
//! header. This module only lifts those headers into typed extractors and
//! guards the administrative endpoints.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};

use crate::application::config::AccountsConfig;
use crate::error::{AccountError, AccountResult};

/// Header carrying the issuer-verified subject
pub const SUBJECT_HEADER: &str = "x-auth-subject";
/// Header carrying the issuer-supplied email, when known
pub const EMAIL_HEADER: &str = "x-auth-email";
/// Header carrying the shared admin token
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// The authenticated caller, as asserted by the upstream token issuer
#[derive(Debug, Clone)]
pub struct AuthSubject {
    pub subject: String,
    pub email: Option<String>,
}

impl<S> FromRequestParts<S> for AuthSubject
where
    S: Send + Sync,
{
    type Rejection = AccountError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let subject = parts
            .headers
            .get(SUBJECT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(AccountError::MissingSubject)?;

        let email = parts
            .headers
            .get(EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self { subject, email })
    }
}

/// Check the shared admin token; a missing configured token locks admin
/// endpoints out entirely
pub fn authorize_admin(config: &AccountsConfig, headers: &HeaderMap) -> AccountResult<()> {
    let expected = config
        .admin_token
        .as_deref()
        .ok_or(AccountError::AdminAccessDenied)?;

    let supplied = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AccountError::AdminAccessDenied)?;

    if platform::crypto::constant_time_eq(expected.as_bytes(), supplied.as_bytes()) {
        Ok(())
    } else {
        Err(AccountError::AdminAccessDenied)
    }
}
