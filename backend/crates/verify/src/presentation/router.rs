//! Verify Router

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::PgPool;
use std::sync::Arc;

use accounts::{PgAccountRepository, UserRepository};

use crate::application::config::VerifyConfig;
use crate::domain::repository::{
    IdentityEventLogRepository, IdentitySessionProvider, KycTrackingRepository,
};
use crate::infra::idenfy::IdenfyProvider;
use crate::infra::postgres::{PgIdentityEventLogRepository, PgKycTrackingRepository};
use crate::presentation::handlers::{self, VerifyAppState};

/// Create the verify router with PostgreSQL repositories
pub fn verify_router(pool: PgPool, provider: IdenfyProvider, config: VerifyConfig) -> Router {
    verify_router_generic(
        PgIdentityEventLogRepository::new(pool.clone()),
        PgKycTrackingRepository::new(pool.clone()),
        PgAccountRepository::new(pool),
        provider,
        config,
    )
}

/// Create a generic verify router for any repository implementations
pub fn verify_router_generic<L, T, U, I>(
    events: L,
    tracking: T,
    users: U,
    provider: I,
    config: VerifyConfig,
) -> Router
where
    L: IdentityEventLogRepository + Clone + Send + Sync + 'static,
    T: KycTrackingRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    I: IdentitySessionProvider + Clone + Send + Sync + 'static,
{
    let state = VerifyAppState {
        events: Arc::new(events),
        tracking: Arc::new(tracking),
        users: Arc::new(users),
        provider: Arc::new(provider),
        config: Arc::new(config),
    };

    Router::new()
        .route("/webhooks/idenfy", post(handlers::idenfy_webhook::<L, T, U, I>))
        .route("/kyc/start", post(handlers::start_kyc::<L, T, U, I>))
        .route("/kyc/track", post(handlers::track_kyc::<L, T, U, I>))
        .route("/kyc/status", get(handlers::kyc_status::<L, T, U, I>))
        .with_state(state)
}
