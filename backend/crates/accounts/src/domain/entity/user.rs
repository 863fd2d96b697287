//! User Entity
//!
//! The identity anchor every other aggregate references. Provisioned on
//! first authenticated contact, mutated by the payment and identity
//! reconcilers and by administrative override, never hard-deleted.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde_json::Value;

use crate::domain::entity::verification::VerificationRecord;
use crate::domain::value_object::{AccountStatus, KycStatus, PlanTier, UserRole};

/// User aggregate
///
/// `version` is the optimistic-concurrency token: every persisted write is a
/// compare-and-set on it, so concurrent reconcilers cannot interleave
/// read-modify-write cycles on the same user.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Opaque subject from the external token issuer (stable foreign key)
    pub subject: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub plan: PlanTier,
    /// Set by the payment reconciler on intent completion
    pub has_paid: bool,
    pub account_status: AccountStatus,
    pub kyc_status: KycStatus,
    /// Current verification submission; superseded ones are archived
    pub verification: Option<VerificationRecord>,
    /// Stamped once by the activation policy, never re-stamped
    pub activated_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Provision a new pending user on first authenticated contact
    pub fn provision(subject: String, email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            subject,
            email,
            first_name: String::new(),
            last_name: String::new(),
            role: UserRole::default(),
            plan: PlanTier::default(),
            has_paid: false,
            account_status: AccountStatus::default(),
            kyc_status: KycStatus::default(),
            verification: None,
            activated_at: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a completed purchase: mark paid and adopt the purchased plan
    pub fn record_payment(&mut self, plan: PlanTier) {
        self.has_paid = true;
        self.plan = plan;
        self.touch();
    }

    /// Start a new verification session, superseding any previous record
    ///
    /// Returns the superseded record so the caller can archive it. State
    /// checks (no in-flight session, not already approved) belong to the
    /// session use case; this only performs the swap.
    pub fn begin_verification(&mut self, record: VerificationRecord) -> Option<VerificationRecord> {
        let superseded = self.verification.replace(record);
        self.kyc_status = KycStatus::Submitted;
        self.touch();
        superseded
    }

    /// Apply a provider verification result delivered by webhook
    ///
    /// Absolute write: the status is set, `info` is merged into the record
    /// metadata, and `approved_at` is stamped on approval or cleared
    /// otherwise, so redelivery converges to the same state.
    pub fn apply_kyc_result(&mut self, status: KycStatus, info: Value, now: DateTime<Utc>) {
        self.kyc_status = status;
        if let Some(record) = &mut self.verification {
            record.merge_metadata(info);
            record.approved_at = if status.is_approved() {
                Some(now)
            } else {
                None
            };
        }
        self.touch();
    }

    /// Transition to ACTIVE, stamping `activated_at`
    ///
    /// Only the activation policy calls this.
    pub(crate) fn activate(&mut self, now: DateTime<Utc>) {
        self.account_status = AccountStatus::Active;
        self.activated_at = Some(now);
        self.touch();
    }

    /// Administrative status override (cannot reach ACTIVE)
    pub fn set_status(&mut self, status: AccountStatus) {
        self.account_status = status;
        self.touch();
    }

    /// Scan reference of the current verification submission
    pub fn current_scan_ref(&self) -> Option<&str> {
        self.verification.as_ref().map(|v| v.scan_ref.as_str())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
