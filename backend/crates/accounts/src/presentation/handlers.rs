//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::{GetProfileUseCase, OverrideStatusUseCase, ProvisionUserUseCase};
use crate::domain::repository::UserRepository;
use crate::error::AccountResult;
use crate::presentation::dto::{OverrideStatusRequest, OverrideStatusResponse, ProfileResponse};
use crate::presentation::middleware::{AuthSubject, authorize_admin};

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountsAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AccountsConfig>,
}

/// GET /api/accounts/me
pub async fn get_me<R>(
    State(state): State<AccountsAppState<R>>,
    auth: AuthSubject,
) -> AccountResult<Json<ProfileResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    // First authenticated contact provisions the user
    ProvisionUserUseCase::new(state.repo.clone())
        .execute(&auth.subject, auth.email.clone())
        .await?;

    let profile = GetProfileUseCase::new(state.repo.clone())
        .execute(&auth.subject)
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}

/// POST /api/accounts/admin/status
pub async fn override_status<R>(
    State(state): State<AccountsAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<OverrideStatusRequest>,
) -> AccountResult<Json<OverrideStatusResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    authorize_admin(&state.config, &headers)?;

    let status = OverrideStatusUseCase::new(state.repo.clone())
        .execute(req.user_id, &req.status)
        .await?;

    Ok(Json(OverrideStatusResponse {
        user_id: req.user_id,
        status: status.code().to_string(),
    }))
}
