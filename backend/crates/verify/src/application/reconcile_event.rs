//! Identity Webhook Reconciler
//!
//! Validates the payload, logs the delivery unconditionally (the provider
//! supplies no event id, so there is no cross-delivery dedup here), maps
//! the provider status onto the user's verification record, and evaluates
//! account activation on approval. Any failure after the log write is
//! recorded on the log row before it reaches the caller.

use std::sync::Arc;

use accounts::{ActivationService, KycStatus, UserRepository};
use chrono::Utc;
use platform::crypto::{constant_time_eq, from_hex, hmac_sha256};
use serde_json::Value;
use uuid::Uuid;

use crate::application::config::VerifyConfig;
use crate::domain::event::{IdentityEventLog, map_provider_status};
use crate::domain::repository::IdentityEventLogRepository;
use crate::error::{VerifyError, VerifyResult};

const MAX_USER_WRITE_ATTEMPTS: u32 = 3;

/// Identity webhook reconciler use case
pub struct ReconcileIdentityEventUseCase<L, U>
where
    L: IdentityEventLogRepository,
    U: UserRepository,
{
    events: Arc<L>,
    users: Arc<U>,
    config: Arc<VerifyConfig>,
}

impl<L, U> ReconcileIdentityEventUseCase<L, U>
where
    L: IdentityEventLogRepository,
    U: UserRepository,
{
    pub fn new(events: Arc<L>, users: Arc<U>, config: Arc<VerifyConfig>) -> Self {
        Self {
            events,
            users,
            config,
        }
    }

    /// Reconcile one inbound delivery
    pub async fn execute(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> VerifyResult<KycStatus> {
        // Optional verification hook; the provider's default scheme is
        // unauthenticated
        if let Some(secret) = &self.config.webhook_secret {
            let header = signature_header.ok_or(VerifyError::InvalidSignature)?;
            let expected = hmac_sha256(secret.as_bytes(), raw_body);
            let valid = from_hex(header)
                .map(|bytes| constant_time_eq(&bytes, &expected))
                .unwrap_or(false);
            if !valid {
                return Err(VerifyError::InvalidSignature);
            }
        }

        let payload: Value = serde_json::from_slice(raw_body)
            .map_err(|e| VerifyError::InvalidPayload(e.to_string()))?;

        let scan_ref = payload
            .get("scanRef")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| VerifyError::InvalidPayload("scanRef is required".to_string()))?
            .to_string();
        let provider_status = payload
            .get("status")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| VerifyError::InvalidPayload("status is required".to_string()))?
            .to_string();
        let info = payload.get("info").cloned().unwrap_or(Value::Null);

        // Logged before any state change, whatever happens next
        let entry = IdentityEventLog::new(scan_ref.clone(), provider_status.clone(), info.clone());
        self.events.insert(&entry).await?;
        let log_id = entry.log_id.into_uuid();

        let status = map_provider_status(&provider_status);

        match self.apply(&scan_ref, status, info).await {
            Ok(user_id) => {
                self.events.mark_processed(log_id).await?;
                tracing::info!(
                    scan_ref = %scan_ref,
                    status = %status,
                    "Identity event processed"
                );

                if status.is_approved() {
                    ActivationService::new(self.users.clone())
                        .maybe_activate(user_id)
                        .await?;
                }
                Ok(status)
            }
            Err(err) => {
                self.events.mark_failed(log_id, &err.to_string()).await?;
                Err(err)
            }
        }
    }

    /// Apply the mapped status to the user owning the scan reference
    async fn apply(&self, scan_ref: &str, status: KycStatus, info: Value) -> VerifyResult<Uuid> {
        for _ in 0..MAX_USER_WRITE_ATTEMPTS {
            let mut user = self
                .users
                .find_by_active_scan_ref(scan_ref)
                .await?
                .ok_or(VerifyError::UserNotFound)?;
            let user_id = *user.user_id.as_uuid();

            user.apply_kyc_result(status, info.clone(), Utc::now());

            if self.users.update(&user).await? {
                return Ok(user_id);
            }
        }

        Err(VerifyError::Account(
            accounts::AccountError::ActivationConflict,
        ))
    }
}
