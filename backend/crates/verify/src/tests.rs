//! Unit tests for verify crate

use std::sync::{Arc, Mutex};

use accounts::{
    AccountStatus, KycStatus, User, UserRepository, VerificationRecord,
};
use chrono::{DateTime, Utc};
use kernel::store::InsertOutcome;
use platform::crypto::{hmac_sha256, to_hex};
use serde_json::json;
use uuid::Uuid;

use crate::application::config::VerifyConfig;
use crate::application::{
    ReconcileIdentityEventUseCase, StartKycSessionUseCase, StartSessionInput,
    TrackCompletionUseCase, TrackOutcome,
};
use crate::domain::event::IdentityEventLog;
use crate::domain::repository::{
    IdentityEventLogRepository, IdentitySession, IdentitySessionProvider, KycTrackingRepository,
    SessionRequest,
};
use crate::error::{VerifyError, VerifyResult};

#[derive(Clone, Default)]
pub struct MemoryIdentityEvents {
    rows: Arc<Mutex<Vec<IdentityEventLog>>>,
}

impl MemoryIdentityEvents {
    fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn last(&self) -> Option<IdentityEventLog> {
        self.rows.lock().unwrap().last().cloned()
    }
}

impl IdentityEventLogRepository for MemoryIdentityEvents {
    async fn insert(&self, entry: &IdentityEventLog) -> VerifyResult<()> {
        self.rows.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn mark_processed(&self, log_id: Uuid) -> VerifyResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(entry) = rows.iter_mut().find(|e| *e.log_id.as_uuid() == log_id) {
            entry.processed = true;
            entry.error = None;
        }
        Ok(())
    }

    async fn mark_failed(&self, log_id: Uuid, error: &str) -> VerifyResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(entry) = rows.iter_mut().find(|e| *e.log_id.as_uuid() == log_id) {
            entry.processed = false;
            entry.error = Some(error.to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryTracking {
    rows: Arc<Mutex<Vec<(Uuid, String)>>>,
}

impl KycTrackingRepository for MemoryTracking {
    async fn insert_if_absent(
        &self,
        user_id: Uuid,
        scan_ref: &str,
        _viewed_at: DateTime<Utc>,
    ) -> VerifyResult<InsertOutcome> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|(u, s)| *u == user_id && s == scan_ref) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        rows.push((user_id, scan_ref.to_string()));
        Ok(InsertOutcome::Inserted)
    }
}

#[derive(Clone, Default)]
pub struct MemoryUsers {
    rows: Arc<Mutex<Vec<User>>>,
    archived: Arc<Mutex<Vec<VerificationRecord>>>,
}

impl MemoryUsers {
    fn with_user(user: User) -> Self {
        let repo = Self::default();
        repo.rows.lock().unwrap().push(user);
        repo
    }

    fn snapshot(&self, user_id: Uuid) -> Option<User> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| *u.user_id.as_uuid() == user_id)
            .cloned()
    }

    fn archived_scan_refs(&self) -> Vec<String> {
        self.archived
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.scan_ref.clone())
            .collect()
    }
}

impl UserRepository for MemoryUsers {
    async fn insert_if_absent(&self, user: &User) -> accounts::AccountResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.iter().any(|u| u.subject == user.subject) {
            rows.push(user.clone());
        }
        Ok(())
    }

    async fn find_by_subject(&self, subject: &str) -> accounts::AccountResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.subject == subject)
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> accounts::AccountResult<Option<User>> {
        Ok(self.snapshot(user_id))
    }

    async fn find_by_active_scan_ref(
        &self,
        scan_ref: &str,
    ) -> accounts::AccountResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.current_scan_ref() == Some(scan_ref))
            .cloned())
    }

    async fn update(&self, user: &User) -> accounts::AccountResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let Some(stored) = rows
            .iter_mut()
            .find(|u| u.user_id.as_uuid() == user.user_id.as_uuid())
        else {
            return Ok(false);
        };
        if stored.version != user.version {
            return Ok(false);
        }
        let mut next = user.clone();
        next.version += 1;
        *stored = next;
        Ok(true)
    }

    async fn archive_verification(
        &self,
        _user_id: Uuid,
        record: &VerificationRecord,
    ) -> accounts::AccountResult<()> {
        self.archived.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockProvider {
    calls: Arc<Mutex<u32>>,
}

impl MockProvider {
    fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl IdentitySessionProvider for MockProvider {
    async fn create_session(&self, _request: &SessionRequest) -> VerifyResult<IdentitySession> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        Ok(IdentitySession {
            scan_ref: format!("scan-new-{}", *calls),
            auth_token: "tok-123".to_string(),
        })
    }
}

/// User with an in-flight submission for `scan-1`
fn submitted_user(has_paid: bool) -> User {
    let mut user = User::provision("auth0|kyc".into(), Some("kyc@example.com".into()));
    user.has_paid = has_paid;
    user.begin_verification(VerificationRecord::new(
        "PASSPORT".into(),
        "P1".into(),
        "scan-1".into(),
        json!({"locale": "en"}),
    ));
    user
}

fn webhook_body(scan_ref: &str, status: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "scanRef": scan_ref,
        "status": status,
        "info": { "docType": "PASSPORT" }
    }))
    .unwrap()
}

mod reconciler_tests {
    use super::*;

    fn reconciler(
        events: &Arc<MemoryIdentityEvents>,
        users: &Arc<MemoryUsers>,
        config: VerifyConfig,
    ) -> ReconcileIdentityEventUseCase<MemoryIdentityEvents, MemoryUsers> {
        ReconcileIdentityEventUseCase::new(events.clone(), users.clone(), Arc::new(config))
    }

    #[tokio::test]
    async fn test_approved_updates_user_and_log() {
        let user = submitted_user(false);
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let events = Arc::new(MemoryIdentityEvents::default());

        let status = reconciler(&events, &users, VerifyConfig::development())
            .execute(&webhook_body("scan-1", "APPROVED"), None)
            .await
            .unwrap();

        assert_eq!(status, KycStatus::Approved);

        let stored = users.snapshot(user_id).unwrap();
        assert_eq!(stored.kyc_status, KycStatus::Approved);
        let record = stored.verification.as_ref().unwrap();
        assert!(record.approved_at.is_some());
        // Provider info merged into the existing metadata
        assert_eq!(record.metadata["locale"], "en");
        assert_eq!(record.metadata["docType"], "PASSPORT");

        let log = events.last().unwrap();
        assert!(log.processed);
        assert!(log.error.is_none());

        // Unpaid user stays pending
        assert_eq!(stored.account_status, AccountStatus::Pending);
    }

    #[tokio::test]
    async fn test_approved_with_payment_activates() {
        let user = submitted_user(true);
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let events = Arc::new(MemoryIdentityEvents::default());

        reconciler(&events, &users, VerifyConfig::development())
            .execute(&webhook_body("scan-1", "APPROVED"), None)
            .await
            .unwrap();

        let stored = users.snapshot(user_id).unwrap();
        assert_eq!(stored.account_status, AccountStatus::Active);
        assert!(stored.activated_at.is_some());
    }

    #[tokio::test]
    async fn test_declined_maps_to_rejected() {
        let user = submitted_user(true);
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let events = Arc::new(MemoryIdentityEvents::default());

        let status = reconciler(&events, &users, VerifyConfig::development())
            .execute(&webhook_body("scan-1", "DECLINED"), None)
            .await
            .unwrap();

        assert_eq!(status, KycStatus::Rejected);
        let stored = users.snapshot(user_id).unwrap();
        assert_eq!(stored.kyc_status, KycStatus::Rejected);
        assert!(stored.verification.as_ref().unwrap().approved_at.is_none());
        // Rejection never activates
        assert_eq!(stored.account_status, AccountStatus::Pending);
    }

    #[tokio::test]
    async fn test_other_status_maps_to_submitted() {
        let user = submitted_user(false);
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let events = Arc::new(MemoryIdentityEvents::default());

        let status = reconciler(&events, &users, VerifyConfig::development())
            .execute(&webhook_body("scan-1", "EXPIRED"), None)
            .await
            .unwrap();

        assert_eq!(status, KycStatus::Submitted);
        assert_eq!(
            users.snapshot(user_id).unwrap().kyc_status,
            KycStatus::Submitted
        );
    }

    #[tokio::test]
    async fn test_missing_scan_ref_persists_nothing() {
        let users = Arc::new(MemoryUsers::with_user(submitted_user(false)));
        let events = Arc::new(MemoryIdentityEvents::default());
        let body = serde_json::to_vec(&json!({"status": "APPROVED"})).unwrap();

        let err = reconciler(&events, &users, VerifyConfig::development())
            .execute(&body, None)
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::InvalidPayload(_)));
        assert_eq!(events.count(), 0);
    }

    #[tokio::test]
    async fn test_missing_status_persists_nothing() {
        let users = Arc::new(MemoryUsers::with_user(submitted_user(false)));
        let events = Arc::new(MemoryIdentityEvents::default());
        let body = serde_json::to_vec(&json!({"scanRef": "scan-1"})).unwrap();

        let err = reconciler(&events, &users, VerifyConfig::development())
            .execute(&body, None)
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::InvalidPayload(_)));
        assert_eq!(events.count(), 0);
    }

    #[tokio::test]
    async fn test_unmatched_scan_ref_marks_log_failed() {
        let user = submitted_user(false);
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let events = Arc::new(MemoryIdentityEvents::default());

        let err = reconciler(&events, &users, VerifyConfig::development())
            .execute(&webhook_body("scan-other", "APPROVED"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::UserNotFound));

        let log = events.last().unwrap();
        assert!(!log.processed);
        assert_eq!(log.error.as_deref(), Some("User not found for this scanRef"));

        // No user was mutated
        assert_eq!(
            users.snapshot(user_id).unwrap().kyc_status,
            KycStatus::Submitted
        );
    }

    #[tokio::test]
    async fn test_configured_secret_rejects_bad_signature() {
        let users = Arc::new(MemoryUsers::with_user(submitted_user(false)));
        let events = Arc::new(MemoryIdentityEvents::default());
        let config = VerifyConfig::new("k".into(), "s".into(), Some("whsec".into()));
        let body = webhook_body("scan-1", "APPROVED");

        let reconciler = reconciler(&events, &users, config);

        let err = reconciler.execute(&body, None).await.unwrap_err();
        assert!(matches!(err, VerifyError::InvalidSignature));

        let err = reconciler.execute(&body, Some("deadbeef")).await.unwrap_err();
        assert!(matches!(err, VerifyError::InvalidSignature));

        assert_eq!(events.count(), 0);
    }

    #[tokio::test]
    async fn test_configured_secret_accepts_valid_signature() {
        let user = submitted_user(false);
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let events = Arc::new(MemoryIdentityEvents::default());
        let config = VerifyConfig::new("k".into(), "s".into(), Some("whsec".into()));
        let body = webhook_body("scan-1", "APPROVED");
        let signature = to_hex(&hmac_sha256(b"whsec", &body));

        reconciler(&events, &users, config)
            .execute(&body, Some(&signature))
            .await
            .unwrap();

        assert_eq!(
            users.snapshot(user_id).unwrap().kyc_status,
            KycStatus::Approved
        );
    }
}

mod session_tests {
    use super::*;

    fn use_case(
        users: &Arc<MemoryUsers>,
        provider: &Arc<MockProvider>,
    ) -> StartKycSessionUseCase<MemoryUsers, MockProvider> {
        StartKycSessionUseCase::new(
            users.clone(),
            provider.clone(),
            Arc::new(VerifyConfig::development()),
        )
    }

    fn input() -> StartSessionInput {
        StartSessionInput {
            document_type: "PASSPORT".into(),
            document_number: "P9".into(),
        }
    }

    #[tokio::test]
    async fn test_start_from_pending() {
        let user = User::provision("auth0|new".into(), None);
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let provider = Arc::new(MockProvider::default());

        let output = use_case(&users, &provider)
            .execute(user_id, input())
            .await
            .unwrap();

        assert_eq!(output.scan_ref, "scan-new-1");
        assert!(output.redirect_url.contains("authToken=tok-123"));

        let stored = users.snapshot(user_id).unwrap();
        assert_eq!(stored.kyc_status, KycStatus::Submitted);
        assert_eq!(stored.current_scan_ref(), Some("scan-new-1"));
        assert!(users.archived_scan_refs().is_empty());
    }

    #[tokio::test]
    async fn test_start_blocked_while_in_flight() {
        let user = submitted_user(false);
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let provider = Arc::new(MockProvider::default());

        let err = use_case(&users, &provider)
            .execute(user_id, input())
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::SessionInFlight));
        // The in-flight scan reference is untouched and no session was bought
        assert_eq!(
            users.snapshot(user_id).unwrap().current_scan_ref(),
            Some("scan-1")
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_start_blocked_when_approved() {
        let mut user = submitted_user(false);
        user.apply_kyc_result(KycStatus::Approved, json!({}), Utc::now());
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let provider = Arc::new(MockProvider::default());

        let err = use_case(&users, &provider)
            .execute(user_id, input())
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::AlreadyApproved));
    }

    #[tokio::test]
    async fn test_resubmission_after_rejection_archives() {
        let mut user = submitted_user(false);
        user.apply_kyc_result(KycStatus::Rejected, json!({}), Utc::now());
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let provider = Arc::new(MockProvider::default());

        let output = use_case(&users, &provider)
            .execute(user_id, input())
            .await
            .unwrap();

        let stored = users.snapshot(user_id).unwrap();
        assert_eq!(stored.kyc_status, KycStatus::Submitted);
        assert_eq!(stored.current_scan_ref(), Some(output.scan_ref.as_str()));
        assert_eq!(users.archived_scan_refs(), vec!["scan-1".to_string()]);
    }

    #[tokio::test]
    async fn test_start_rejects_missing_document_type() {
        let user = User::provision("auth0|new".into(), None);
        let user_id = *user.user_id.as_uuid();
        let users = Arc::new(MemoryUsers::with_user(user));
        let provider = Arc::new(MockProvider::default());

        let err = use_case(&users, &provider)
            .execute(
                user_id,
                StartSessionInput {
                    document_type: "  ".into(),
                    document_number: String::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::InvalidPayload(_)));
    }
}

mod tracking_tests {
    use super::*;

    #[tokio::test]
    async fn test_tracking_is_idempotent() {
        let user = submitted_user(false);
        let tracking = Arc::new(MemoryTracking::default());
        let use_case = TrackCompletionUseCase::new(tracking.clone());

        assert_eq!(
            use_case.execute(&user, "scan-1").await.unwrap(),
            TrackOutcome::Tracked
        );
        assert_eq!(
            use_case.execute(&user, "scan-1").await.unwrap(),
            TrackOutcome::AlreadyTracked
        );
        assert_eq!(tracking.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tracking_rejects_mismatched_scan_ref() {
        let user = submitted_user(false);
        let tracking = Arc::new(MemoryTracking::default());

        let err = TrackCompletionUseCase::new(tracking.clone())
            .execute(&user, "scan-other")
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::ScanRefMismatch));
        assert!(tracking.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tracking_rejects_empty_scan_ref() {
        let user = submitted_user(false);
        let tracking = Arc::new(MemoryTracking::default());

        let err = TrackCompletionUseCase::new(tracking)
            .execute(&user, "")
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::InvalidPayload(_)));
    }
}
