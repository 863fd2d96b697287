//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use std::sync::Arc;

use accounts::{AuthSubject, ProvisionUserUseCase, UserRepository};

use crate::application::config::VerifyConfig;
use crate::application::{
    KycStatusUseCase, ReconcileIdentityEventUseCase, StartKycSessionUseCase, StartSessionInput,
    TrackCompletionUseCase,
};
use crate::domain::repository::{
    IdentityEventLogRepository, IdentitySessionProvider, KycTrackingRepository,
};
use crate::error::VerifyResult;
use crate::presentation::dto::{
    KycStatusResponse, StartSessionRequest, StartSessionResponse, TrackRequest, TrackResponse,
    WebhookResponse,
};

/// Header carrying the optional webhook signature
pub const SIGNATURE_HEADER: &str = "idenfy-signature";

/// Shared state for verify handlers
#[derive(Clone)]
pub struct VerifyAppState<L, T, U, I>
where
    L: IdentityEventLogRepository + Clone + Send + Sync + 'static,
    T: KycTrackingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    I: IdentitySessionProvider + Clone + Send + Sync + 'static,
{
    pub events: Arc<L>,
    pub tracking: Arc<T>,
    pub users: Arc<U>,
    pub provider: Arc<I>,
    pub config: Arc<VerifyConfig>,
}

/// POST /api/verify/webhooks/idenfy
///
/// Raw-body endpoint: when a signature secret is configured it covers the
/// exact bytes on the wire.
pub async fn idenfy_webhook<L, T, U, I>(
    State(state): State<VerifyAppState<L, T, U, I>>,
    headers: HeaderMap,
    body: Bytes,
) -> VerifyResult<Json<WebhookResponse>>
where
    L: IdentityEventLogRepository + Clone + Send + Sync + 'static,
    T: KycTrackingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    I: IdentitySessionProvider + Clone + Send + Sync + 'static,
{
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    let status = ReconcileIdentityEventUseCase::new(
        state.events.clone(),
        state.users.clone(),
        state.config.clone(),
    )
    .execute(&body, signature)
    .await?;

    Ok(Json(WebhookResponse {
        message: format!("KYC status updated to {status}"),
    }))
}

/// POST /api/verify/kyc/start
pub async fn start_kyc<L, T, U, I>(
    State(state): State<VerifyAppState<L, T, U, I>>,
    auth: AuthSubject,
    Json(req): Json<StartSessionRequest>,
) -> VerifyResult<Json<StartSessionResponse>>
where
    L: IdentityEventLogRepository + Clone + Send + Sync + 'static,
    T: KycTrackingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    I: IdentitySessionProvider + Clone + Send + Sync + 'static,
{
    let user = ProvisionUserUseCase::new(state.users.clone())
        .execute(&auth.subject, auth.email.clone())
        .await?;

    let output = StartKycSessionUseCase::new(
        state.users.clone(),
        state.provider.clone(),
        state.config.clone(),
    )
    .execute(
        *user.user_id.as_uuid(),
        StartSessionInput {
            document_type: req.document_type,
            document_number: req.document_number,
        },
    )
    .await?;

    Ok(Json(StartSessionResponse::from(output)))
}

/// POST /api/verify/kyc/track
pub async fn track_kyc<L, T, U, I>(
    State(state): State<VerifyAppState<L, T, U, I>>,
    auth: AuthSubject,
    Json(req): Json<TrackRequest>,
) -> VerifyResult<Json<TrackResponse>>
where
    L: IdentityEventLogRepository + Clone + Send + Sync + 'static,
    T: KycTrackingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    I: IdentitySessionProvider + Clone + Send + Sync + 'static,
{
    let user = ProvisionUserUseCase::new(state.users.clone())
        .execute(&auth.subject, auth.email.clone())
        .await?;

    let outcome = TrackCompletionUseCase::new(state.tracking.clone())
        .execute(&user, &req.scan_ref)
        .await?;

    Ok(Json(TrackResponse::from(outcome)))
}

/// GET /api/verify/kyc/status
pub async fn kyc_status<L, T, U, I>(
    State(state): State<VerifyAppState<L, T, U, I>>,
    auth: AuthSubject,
) -> VerifyResult<Json<KycStatusResponse>>
where
    L: IdentityEventLogRepository + Clone + Send + Sync + 'static,
    T: KycTrackingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    I: IdentitySessionProvider + Clone + Send + Sync + 'static,
{
    let user = ProvisionUserUseCase::new(state.users.clone())
        .execute(&auth.subject, auth.email.clone())
        .await?;

    let output = KycStatusUseCase::new(state.users.clone())
        .execute(*user.user_id.as_uuid())
        .await?;

    Ok(Json(KycStatusResponse::from(output)))
}
