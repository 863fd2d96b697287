//! Get Profile Use Case
//!
//! Client-facing view of the current user.

use std::sync::Arc;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};

/// Client-view projection of a user
#[derive(Debug, Clone)]
pub struct ProfileOutput {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: String,
    pub plan: String,
    pub has_paid: bool,
    pub account_status: String,
    pub kyc_status: String,
}

impl From<&User> for ProfileOutput {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role.code().to_string(),
            plan: user.plan.code().to_string(),
            has_paid: user.has_paid,
            account_status: user.account_status.code().to_string(),
            kyc_status: user.kyc_status.code().to_string(),
        }
    }
}

/// Get profile use case
pub struct GetProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, subject: &str) -> AccountResult<ProfileOutput> {
        let user = self
            .user_repo
            .find_by_subject(subject)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        Ok(ProfileOutput::from(&user))
    }
}
