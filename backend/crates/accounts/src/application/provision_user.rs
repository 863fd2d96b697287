//! Provision User Use Case
//!
//! Ensures a user row exists for an authenticated subject. Runs on every
//! authenticated request; the first contact creates a PENDING user.

use std::sync::Arc;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::error::{AccountError, AccountResult};

/// Provision user use case
pub struct ProvisionUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ProvisionUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Fetch the user for this subject, creating one on first contact
    pub async fn execute(&self, subject: &str, email: Option<String>) -> AccountResult<User> {
        if let Some(user) = self.user_repo.find_by_subject(subject).await? {
            return Ok(user);
        }

        let user = User::provision(subject.to_string(), email);
        // A concurrent first contact may win the insert; re-read either way
        self.user_repo.insert_if_absent(&user).await?;

        match self.user_repo.find_by_subject(subject).await? {
            Some(user) => {
                tracing::info!(user_id = %user.user_id, "User provisioned");
                Ok(user)
            }
            None => Err(AccountError::Internal(
                "user vanished after provisioning insert".to_string(),
            )),
        }
    }
}
