//! Override Status Use Case
//!
//! Administrative account-status override. ACTIVE is rejected here: the
//! activation policy is the only path to it.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::AccountStatus;
use crate::error::{AccountError, AccountResult};

const MAX_ATTEMPTS: u32 = 3;

/// Override status use case
pub struct OverrideStatusUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> OverrideStatusUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: Uuid, status_code: &str) -> AccountResult<AccountStatus> {
        let status = AccountStatus::from_code(status_code)
            .ok_or_else(|| AccountError::UnknownStatus(status_code.to_string()))?;

        if status.is_active() {
            return Err(AccountError::DirectActivation);
        }

        for _ in 0..MAX_ATTEMPTS {
            let mut user = self
                .user_repo
                .find_by_id(user_id)
                .await?
                .ok_or(AccountError::UserNotFound)?;

            user.set_status(status);

            if self.user_repo.update(&user).await? {
                tracing::info!(user_id = %user_id, status = %status, "Account status overridden");
                return Ok(status);
            }
        }

        Err(AccountError::ActivationConflict)
    }
}
