//! Repository and Provider Traits

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::event::IdentityEventLog;
use crate::error::VerifyResult;
use kernel::store::InsertOutcome;

/// Identity event log persistence
///
/// Rows are append-only; only the outcome fields (`processed`, `error`)
/// are ever written after the insert.
#[trait_variant::make(IdentityEventLogRepository: Send)]
pub trait LocalIdentityEventLogRepository {
    async fn insert(&self, entry: &IdentityEventLog) -> VerifyResult<()>;

    async fn mark_processed(&self, log_id: Uuid) -> VerifyResult<()>;

    async fn mark_failed(&self, log_id: Uuid, error: &str) -> VerifyResult<()>;
}

/// Completion-tracking persistence
///
/// One row per `(user_id, scan_ref)`; re-declaring is detected through
/// `AlreadyExists`.
#[trait_variant::make(KycTrackingRepository: Send)]
pub trait LocalKycTrackingRepository {
    async fn insert_if_absent(
        &self,
        user_id: Uuid,
        scan_ref: &str,
        viewed_at: DateTime<Utc>,
    ) -> VerifyResult<InsertOutcome>;
}

/// Session issued by the identity provider
#[derive(Debug, Clone)]
pub struct IdentitySession {
    pub scan_ref: String,
    pub auth_token: String,
}

/// Applicant data sent when starting a session
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub client_id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Opaque identity verification provider
#[trait_variant::make(IdentitySessionProvider: Send)]
pub trait LocalIdentitySessionProvider {
    async fn create_session(&self, request: &SessionRequest) -> VerifyResult<IdentitySession>;
}
