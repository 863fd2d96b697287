//! KYC Status Use Case

use std::sync::Arc;

use accounts::UserRepository;
use uuid::Uuid;

use crate::error::{VerifyError, VerifyResult};

/// Current verification state, as shown to the applicant
#[derive(Debug, Clone)]
pub struct KycStatusOutput {
    pub kyc_status: String,
    pub email: Option<String>,
    pub scan_ref: Option<String>,
}

/// KYC status use case
pub struct KycStatusUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
}

impl<U> KycStatusUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, user_id: Uuid) -> VerifyResult<KycStatusOutput> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(VerifyError::UserNotFound)?;

        Ok(KycStatusOutput {
            kyc_status: user.kyc_status.code().to_string(),
            email: user.email.clone(),
            scan_ref: user.current_scan_ref().map(str::to_string),
        })
    }
}
