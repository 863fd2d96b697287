//! Start KYC Session Use Case
//!
//! Asks the identity provider for a verification session and records the
//! resulting scan reference as the user's current submission. Permitted
//! only from PENDING or REJECTED; an in-flight SUBMITTED session must not
//! have its scan reference overwritten.

use std::sync::Arc;

use accounts::{UserRepository, VerificationRecord};
use serde_json::json;
use uuid::Uuid;

use crate::application::config::VerifyConfig;
use crate::domain::repository::{IdentitySession, IdentitySessionProvider, SessionRequest};
use crate::error::{VerifyError, VerifyResult};

const MAX_USER_WRITE_ATTEMPTS: u32 = 3;

/// Applicant-declared document details
#[derive(Debug, Clone)]
pub struct StartSessionInput {
    pub document_type: String,
    pub document_number: String,
}

#[derive(Debug, Clone)]
pub struct StartSessionOutput {
    pub scan_ref: String,
    pub auth_token: String,
    pub redirect_url: String,
}

/// Start KYC session use case
pub struct StartKycSessionUseCase<U, I>
where
    U: UserRepository,
    I: IdentitySessionProvider,
{
    users: Arc<U>,
    provider: Arc<I>,
    config: Arc<VerifyConfig>,
}

impl<U, I> StartKycSessionUseCase<U, I>
where
    U: UserRepository,
    I: IdentitySessionProvider,
{
    pub fn new(users: Arc<U>, provider: Arc<I>, config: Arc<VerifyConfig>) -> Self {
        Self {
            users,
            provider,
            config,
        }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        input: StartSessionInput,
    ) -> VerifyResult<StartSessionOutput> {
        if input.document_type.trim().is_empty() {
            return Err(VerifyError::InvalidPayload(
                "documentType is required".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(VerifyError::UserNotFound)?;

        Self::check_can_start(&user)?;

        // The provider call happens once, outside the CAS retry loop
        let session = self
            .provider
            .create_session(&SessionRequest {
                client_id: user.subject.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
            })
            .await?;

        self.record_session(user_id, &input, &session).await?;

        tracing::info!(
            user_id = %user_id,
            scan_ref = %session.scan_ref,
            "Verification session started"
        );

        Ok(StartSessionOutput {
            redirect_url: format!(
                "{}?authToken={}",
                self.config.redirect_base, session.auth_token
            ),
            scan_ref: session.scan_ref,
            auth_token: session.auth_token,
        })
    }

    fn check_can_start(user: &accounts::User) -> VerifyResult<()> {
        if user.kyc_status.can_start_session() {
            return Ok(());
        }
        if user.kyc_status.is_approved() {
            Err(VerifyError::AlreadyApproved)
        } else {
            Err(VerifyError::SessionInFlight)
        }
    }

    async fn record_session(
        &self,
        user_id: Uuid,
        input: &StartSessionInput,
        session: &IdentitySession,
    ) -> VerifyResult<()> {
        for _ in 0..MAX_USER_WRITE_ATTEMPTS {
            let mut user = self
                .users
                .find_by_id(user_id)
                .await?
                .ok_or(VerifyError::UserNotFound)?;

            // A concurrent start may have slipped in since the first read
            Self::check_can_start(&user)?;

            let record = VerificationRecord::new(
                input.document_type.clone(),
                input.document_number.clone(),
                session.scan_ref.clone(),
                json!({}),
            );
            let superseded = user.begin_verification(record);

            if self.users.update(&user).await? {
                if let Some(previous) = superseded {
                    self.users.archive_verification(user_id, &previous).await?;
                }
                return Ok(());
            }
        }

        Err(VerifyError::Account(
            accounts::AccountError::ActivationConflict,
        ))
    }
}
