//! Track Completion Use Case
//!
//! Client-initiated declaration that a verification session finished on
//! the applicant's side. The declared scan reference must match the
//! user's current submission; re-declaring is a no-op success.

use std::sync::Arc;

use accounts::User;
use chrono::Utc;
use kernel::store::InsertOutcome;

use crate::domain::repository::KycTrackingRepository;
use crate::error::{VerifyError, VerifyResult};

/// Result of a tracking declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    Tracked,
    AlreadyTracked,
}

/// Track completion use case
pub struct TrackCompletionUseCase<T>
where
    T: KycTrackingRepository,
{
    tracking: Arc<T>,
}

impl<T> TrackCompletionUseCase<T>
where
    T: KycTrackingRepository,
{
    pub fn new(tracking: Arc<T>) -> Self {
        Self { tracking }
    }

    pub async fn execute(&self, user: &User, scan_ref: &str) -> VerifyResult<TrackOutcome> {
        if scan_ref.trim().is_empty() {
            return Err(VerifyError::InvalidPayload(
                "scanRef is required".to_string(),
            ));
        }

        if user.current_scan_ref() != Some(scan_ref) {
            return Err(VerifyError::ScanRefMismatch);
        }

        let outcome = self
            .tracking
            .insert_if_absent(*user.user_id.as_uuid(), scan_ref, Utc::now())
            .await?;

        Ok(match outcome {
            InsertOutcome::Inserted => {
                tracing::info!(
                    user_id = %user.user_id,
                    scan_ref = %scan_ref,
                    "Verification completion tracked"
                );
                TrackOutcome::Tracked
            }
            InsertOutcome::AlreadyExists => TrackOutcome::AlreadyTracked,
        })
    }
}
