//! Account Activation Policy
//!
//! Activation is the only path to `AccountStatus::Active`: KYC approved AND
//! payment completed. It is one-way; a later KYC rejection or refund does
//! not revoke an active account.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::{AccountStatus, KycStatus};
use crate::error::{AccountError, AccountResult};

/// CAS retry budget for the read-modify-write cycle
const MAX_ATTEMPTS: u32 = 3;

/// Pure activation decision
///
/// True iff both conditions hold and the account is not already active.
/// Already-active accounts must not be re-stamped.
pub fn activation_decision(
    kyc_status: KycStatus,
    has_paid: bool,
    account_status: AccountStatus,
) -> bool {
    kyc_status.is_approved() && has_paid && !account_status.is_active()
}

/// Applies the activation decision with optimistic-concurrency retries
///
/// Both webhook reconcilers call this after mutating their side of the
/// condition; repeated invocation with the same inputs is a no-op.
pub struct ActivationService<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ActivationService<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Evaluate and, if warranted, persist activation for the user
    ///
    /// Returns true when this call performed the activation. A concurrent
    /// writer bumping the user's version forces a re-read and re-decision,
    /// so a stale `has_paid`/`kyc_status` snapshot is never acted upon.
    pub async fn maybe_activate(&self, user_id: Uuid) -> AccountResult<bool> {
        for attempt in 1..=MAX_ATTEMPTS {
            let mut user = self
                .user_repo
                .find_by_id(user_id)
                .await?
                .ok_or(AccountError::UserNotFound)?;

            if !activation_decision(user.kyc_status, user.has_paid, user.account_status) {
                return Ok(false);
            }

            user.activate(Utc::now());

            if self.user_repo.update(&user).await? {
                tracing::info!(user_id = %user_id, "Account activated");
                return Ok(true);
            }

            tracing::debug!(
                user_id = %user_id,
                attempt,
                "Activation write conflicted, retrying"
            );
        }

        Err(AccountError::ActivationConflict)
    }
}
