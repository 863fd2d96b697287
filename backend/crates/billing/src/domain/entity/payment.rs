//! Payment Ledger Entry
//!
//! One payment attempt, tracked through its lifecycle. Created when a
//! purchase is initiated, mutated only by the webhook reconciler, never
//! deleted.

use chrono::{DateTime, Utc};
use kernel::id::{PaymentId, UserId};
use serde_json::Value;

use crate::domain::value_object::{PaymentKind, PaymentStatus};

/// Payment ledger entry
///
/// `intent_id` is the provider's payment-intent handle; the unique index on
/// it guarantees at most one ledger row per intent.
#[derive(Debug, Clone)]
pub struct Payment {
    pub payment_id: PaymentId,
    pub user_id: UserId,
    pub kind: PaymentKind,
    pub status: PaymentStatus,
    /// Amount in minor units of `currency`
    pub amount: i64,
    pub currency: String,
    pub intent_id: Option<String>,
    pub description: String,
    /// Purchase details (asic model, quantity, bundle type)
    pub metadata: Value,
    pub failure_reason: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Create a pending purchase entry
    pub fn new_purchase(
        user_id: UserId,
        amount: i64,
        currency: String,
        description: String,
        metadata: Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            payment_id: PaymentId::new(),
            user_id,
            kind: PaymentKind::Purchase,
            status: PaymentStatus::Pending,
            amount,
            currency,
            intent_id: None,
            description,
            metadata,
            failure_reason: None,
            processed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Link the provider intent once it has been created
    pub fn attach_intent(&mut self, intent_id: String) {
        self.intent_id = Some(intent_id);
        self.touch();
    }

    /// Transition to COMPLETED, stamping `processed_at`
    ///
    /// Returns false without touching anything when already completed, so
    /// a late `charge.succeeded` after `payment_intent.succeeded` cannot
    /// re-stamp the timestamp.
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.status.is_completed() {
            return false;
        }
        self.status = PaymentStatus::Completed;
        self.processed_at = Some(now);
        self.failure_reason = None;
        self.touch();
        true
    }

    /// Transition to FAILED with the provider's reason
    ///
    /// A completed entry never regresses to failed; re-applying FAILED
    /// only refreshes the reason.
    pub fn fail(&mut self, reason: Option<String>) -> bool {
        if self.status.is_completed() {
            return false;
        }
        self.status = PaymentStatus::Failed;
        self.failure_reason = reason;
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn purchase() -> Payment {
        Payment::new_purchase(
            UserId::new(),
            125_000,
            "usd".into(),
            "ASIC purchase".into(),
            json!({"asicModel": "S19"}),
        )
    }

    #[test]
    fn test_new_purchase_defaults() {
        let p = purchase();
        assert_eq!(p.kind, PaymentKind::Purchase);
        assert_eq!(p.status, PaymentStatus::Pending);
        assert!(p.intent_id.is_none());
        assert!(p.processed_at.is_none());
    }

    #[test]
    fn test_complete_stamps_once() {
        let mut p = purchase();
        let first = Utc::now();
        assert!(p.complete(first));
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(p.processed_at, Some(first));

        // Redelivery must not re-stamp
        let later = first + chrono::Duration::seconds(30);
        assert!(!p.complete(later));
        assert_eq!(p.processed_at, Some(first));
    }

    #[test]
    fn test_fail_records_reason() {
        let mut p = purchase();
        assert!(p.fail(Some("card_declined".into())));
        assert_eq!(p.status, PaymentStatus::Failed);
        assert_eq!(p.failure_reason.as_deref(), Some("card_declined"));
    }

    #[test]
    fn test_fail_does_not_regress_completed() {
        let mut p = purchase();
        p.complete(Utc::now());
        assert!(!p.fail(Some("too late".into())));
        assert_eq!(p.status, PaymentStatus::Completed);
        assert!(p.failure_reason.is_none());
    }

    #[test]
    fn test_complete_clears_earlier_failure() {
        let mut p = purchase();
        p.fail(Some("insufficient_funds".into()));
        assert!(p.complete(Utc::now()));
        assert!(p.failure_reason.is_none());
    }
}
