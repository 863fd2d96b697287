//! Unit tests for billing crate

use std::sync::{Arc, Mutex};

use accounts::{AccountStatus, KycStatus, PlanTier, User, UserRepository, VerificationRecord};
use chrono::Utc;
use kernel::store::InsertOutcome;
use platform::crypto::{hmac_sha256, to_hex};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::application::config::BillingConfig;
use crate::application::{
    CreateIntentInput, CreateIntentUseCase, PaymentHistoryUseCase, ReconcileEventUseCase,
};
use crate::domain::entity::Payment;
use crate::domain::event::PaymentEventLog;
use crate::domain::repository::{
    GatewayIntent, PaymentEventLogRepository, PaymentGateway, PaymentRepository,
};
use crate::domain::value_object::{PaymentKind, PaymentStatus};
use crate::error::{BillingError, BillingResult};

#[derive(Clone, Default)]
pub struct MemoryPayments {
    rows: Arc<Mutex<Vec<Payment>>>,
}

impl MemoryPayments {
    fn with_payment(payment: Payment) -> Self {
        let repo = Self::default();
        repo.rows.lock().unwrap().push(payment);
        repo
    }

    fn snapshot(&self, payment_id: Uuid) -> Option<Payment> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| *p.payment_id.as_uuid() == payment_id)
            .cloned()
    }
}

impl PaymentRepository for MemoryPayments {
    async fn insert(&self, payment: &Payment) -> BillingResult<()> {
        self.rows.lock().unwrap().push(payment.clone());
        Ok(())
    }

    async fn find_by_intent_id(&self, intent_id: &str) -> BillingResult<Option<Payment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.intent_id.as_deref() == Some(intent_id))
            .cloned())
    }

    async fn find_by_id(&self, payment_id: Uuid) -> BillingResult<Option<Payment>> {
        Ok(self.snapshot(payment_id))
    }

    async fn update(&self, payment: &Payment) -> BillingResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(stored) = rows
            .iter_mut()
            .find(|p| p.payment_id.as_uuid() == payment.payment_id.as_uuid())
        {
            *stored = payment.clone();
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<PaymentKind>,
        page: u32,
        limit: u32,
    ) -> BillingResult<(Vec<Payment>, u64)> {
        let mut items: Vec<Payment> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| *p.user_id.as_uuid() == user_id)
            .filter(|p| kind.is_none_or(|k| p.kind == k))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = items.len() as u64;
        let start = ((page - 1) * limit) as usize;
        let items = items.into_iter().skip(start).take(limit as usize).collect();
        Ok((items, total))
    }
}

#[derive(Clone, Default)]
pub struct MemoryEvents {
    rows: Arc<Mutex<Vec<PaymentEventLog>>>,
}

impl MemoryEvents {
    fn snapshot(&self, event_id: &str) -> Option<PaymentEventLog> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.event_id == event_id)
            .cloned()
    }

    fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl PaymentEventLogRepository for MemoryEvents {
    async fn insert_if_absent(&self, entry: &PaymentEventLog) -> BillingResult<InsertOutcome> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|e| e.event_id == entry.event_id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        rows.push(entry.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn find(&self, event_id: &str) -> BillingResult<Option<PaymentEventLog>> {
        Ok(self.snapshot(event_id))
    }

    async fn mark_processed(&self, event_id: &str) -> BillingResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(entry) = rows.iter_mut().find(|e| e.event_id == event_id) {
            entry.processed = true;
            entry.error = None;
        }
        Ok(())
    }

    async fn mark_failed(&self, event_id: &str, error: &str) -> BillingResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(entry) = rows.iter_mut().find(|e| e.event_id == event_id) {
            entry.processed = false;
            entry.error = Some(error.to_string());
        }
        Ok(())
    }

    async fn list(&self, page: u32, limit: u32) -> BillingResult<(Vec<PaymentEventLog>, u64)> {
        let mut items: Vec<PaymentEventLog> = self.rows.lock().unwrap().clone();
        items.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        let total = items.len() as u64;
        let start = ((page - 1) * limit) as usize;
        let items = items.into_iter().skip(start).take(limit as usize).collect();
        Ok((items, total))
    }
}

#[derive(Clone, Default)]
pub struct MemoryUsers {
    rows: Arc<Mutex<Vec<User>>>,
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
        _record: &VerificationRecord,
    ) -> accounts::AccountResult<()> {
        Ok(())
    }
}

fn test_config() -> Arc<BillingConfig> {
    Arc::new(BillingConfig {
        webhook_secret: "whsec_test".to_string(),
        signature_tolerance_secs: 300,
        admin_token: None,
    })
}

fn sign(secret: &str, body: &[u8]) -> String {
    let timestamp = Utc::now().timestamp();
    let payload = [timestamp.to_string().as_bytes(), b".", body].concat();
    format!(
        "t={timestamp},v1={}",
        to_hex(&hmac_sha256(secret.as_bytes(), &payload))
    )
}

fn event_body(event_id: &str, event_type: &str, object: Value) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": event_id,
        "type": event_type,
        "data": { "object": object }
    }))
    .unwrap()
}

struct Fixture {
    payments: Arc<MemoryPayments>,
    events: Arc<MemoryEvents>,
    users: Arc<MemoryUsers>,
    config: Arc<BillingConfig>,
    user_id: Uuid,
    payment_id: Uuid,
}

impl Fixture {
    /// An approved-KYC unpaid user holding a pending ledger entry for `pi_123`
    fn new() -> Self {
        let mut user = User::provision("auth0|miner".into(), None);
        user.kyc_status = KycStatus::Approved;
        let user_id = *user.user_id.as_uuid();

        let mut payment = Payment::new_purchase(
            user.user_id,
            125_000,
            "usd".into(),
            "ASIC purchase: S19 x1".into(),
            json!({}),
        );
        payment.attach_intent("pi_123".into());
        let payment_id = *payment.payment_id.as_uuid();

        Self {
            payments: Arc::new(MemoryPayments::with_payment(payment)),
            events: Arc::new(MemoryEvents::default()),
            users: Arc::new(MemoryUsers::with_user(user)),
            config: test_config(),
            user_id,
            payment_id,
        }
    }

    fn reconciler(
        &self,
    ) -> ReconcileEventUseCase<MemoryPayments, MemoryEvents, MemoryUsers> {
        ReconcileEventUseCase::new(
            self.payments.clone(),
            self.events.clone(),
            self.users.clone(),
            self.config.clone(),
        )
    }

    async fn deliver(&self, body: &[u8]) -> BillingResult<()> {
        let header = sign(&self.config.webhook_secret, body);
        self.reconciler().execute(body, Some(&header)).await
    }
}

mod reconciler_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_signature_persists_nothing() {
        let fx = Fixture::new();
        let body = event_body("evt_1", "payment_intent.succeeded", json!({"id": "pi_123"}));

        let err = fx
            .reconciler()
            .execute(&body, Some("t=123,v1=deadbeef"))
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::InvalidSignature));
        assert_eq!(fx.events.count(), 0);
        assert_eq!(
            fx.payments.snapshot(fx.payment_id).unwrap().status,
            PaymentStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_missing_signature_header_rejected() {
        let fx = Fixture::new();
        let body = event_body("evt_1", "payment_intent.succeeded", json!({"id": "pi_123"}));
        let err = fx.reconciler().execute(&body, None).await.unwrap_err();
        assert!(matches!(err, BillingError::InvalidSignature));
        assert_eq!(fx.events.count(), 0);
    }

    #[tokio::test]
    async fn test_intent_succeeded_completes_and_activates() {
        let fx = Fixture::new();
        let body = event_body(
            "evt_1",
            "payment_intent.succeeded",
            json!({"id": "pi_123", "metadata": {"bundleType": "premium"}}),
        );

        fx.deliver(&body).await.unwrap();

        let payment = fx.payments.snapshot(fx.payment_id).unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.processed_at.is_some());

        let user = fx.users.snapshot(fx.user_id).unwrap();
        assert!(user.has_paid);
        assert_eq!(user.plan, PlanTier::Premium);
        assert_eq!(user.account_status, AccountStatus::Active);
        assert!(user.activated_at.is_some());

        let log = fx.events.snapshot("evt_1").unwrap();
        assert!(log.processed);
        assert!(log.error.is_none());
    }

    #[tokio::test]
    async fn test_intent_succeeded_without_bundle_defaults_standard() {
        let fx = Fixture::new();
        let body = event_body("evt_1", "payment_intent.succeeded", json!({"id": "pi_123"}));

        fx.deliver(&body).await.unwrap();

        assert_eq!(
            fx.users.snapshot(fx.user_id).unwrap().plan,
            PlanTier::Standard
        );
    }

    #[tokio::test]
    async fn test_duplicate_delivery_is_noop_success() {
        let fx = Fixture::new();
        let body = event_body("evt_1", "payment_intent.succeeded", json!({"id": "pi_123"}));

        fx.deliver(&body).await.unwrap();
        let first_stamp = fx.payments.snapshot(fx.payment_id).unwrap().processed_at;
        let first_activation = fx.users.snapshot(fx.user_id).unwrap().activated_at;

        // Redelivery returns success without reapplying anything
        fx.deliver(&body).await.unwrap();

        assert_eq!(fx.events.count(), 1);
        assert_eq!(
            fx.payments.snapshot(fx.payment_id).unwrap().processed_at,
            first_stamp
        );
        assert_eq!(
            fx.users.snapshot(fx.user_id).unwrap().activated_at,
            first_activation
        );
    }

    #[tokio::test]
    async fn test_retry_after_failure_reruns_dispatch() {
        let fx = Fixture::new();
        // References an intent with no ledger row yet
        let body = event_body("evt_1", "payment_intent.succeeded", json!({"id": "pi_999"}));

        let err = fx.deliver(&body).await.unwrap_err();
        assert!(matches!(err, BillingError::LedgerEntryNotFound));

        let log = fx.events.snapshot("evt_1").unwrap();
        assert!(!log.processed);
        assert!(log.error.is_some());

        // The ledger row lands, then the provider redelivers: the logged
        // but unprocessed event must be re-applied, not short-circuited
        let mut late = Payment::new_purchase(
            kernel::id::UserId::from_uuid(fx.user_id),
            5000,
            "usd".into(),
            "late".into(),
            json!({}),
        );
        late.attach_intent("pi_999".into());
        let late_id = *late.payment_id.as_uuid();
        fx.payments.insert(&late).await.unwrap();

        fx.deliver(&body).await.unwrap();

        assert_eq!(
            fx.payments.snapshot(late_id).unwrap().status,
            PaymentStatus::Completed
        );
        assert!(fx.events.snapshot("evt_1").unwrap().processed);
        assert_eq!(fx.events.count(), 1);
    }

    #[tokio::test]
    async fn test_intent_failed_records_reason() {
        let fx = Fixture::new();
        let body = event_body(
            "evt_1",
            "payment_intent.payment_failed",
            json!({
                "id": "pi_123",
                "last_payment_error": { "message": "Your card was declined." }
            }),
        );

        fx.deliver(&body).await.unwrap();

        let payment = fx.payments.snapshot(fx.payment_id).unwrap();
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert_eq!(
            payment.failure_reason.as_deref(),
            Some("Your card was declined.")
        );
        // A failed payment never marks the user paid
        assert!(!fx.users.snapshot(fx.user_id).unwrap().has_paid);
    }

    #[tokio::test]
    async fn test_late_charge_succeeded_does_not_restamp() {
        let fx = Fixture::new();
        let intent = event_body("evt_1", "payment_intent.succeeded", json!({"id": "pi_123"}));
        fx.deliver(&intent).await.unwrap();
        let first_stamp = fx.payments.snapshot(fx.payment_id).unwrap().processed_at;

        let charge = event_body(
            "evt_2",
            "charge.succeeded",
            json!({"id": "ch_1", "payment_intent": "pi_123"}),
        );
        fx.deliver(&charge).await.unwrap();

        let payment = fx.payments.snapshot(fx.payment_id).unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.processed_at, first_stamp);
        assert!(fx.events.snapshot("evt_2").unwrap().processed);
    }

    #[tokio::test]
    async fn test_charge_for_unknown_intent_is_silent_noop() {
        let fx = Fixture::new();
        let body = event_body(
            "evt_1",
            "charge.succeeded",
            json!({"id": "ch_1", "payment_intent": "pi_unknown"}),
        );

        fx.deliver(&body).await.unwrap();

        assert!(fx.events.snapshot("evt_1").unwrap().processed);
        assert_eq!(
            fx.payments.snapshot(fx.payment_id).unwrap().status,
            PaymentStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_charge_failed_records_reason() {
        let fx = Fixture::new();
        let body = event_body(
            "evt_1",
            "charge.failed",
            json!({
                "id": "ch_1",
                "payment_intent": "pi_123",
                "failure_message": "insufficient funds"
            }),
        );

        fx.deliver(&body).await.unwrap();

        let payment = fx.payments.snapshot(fx.payment_id).unwrap();
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert_eq!(payment.failure_reason.as_deref(), Some("insufficient funds"));
    }

    #[tokio::test]
    async fn test_checkout_completed_completes_entry() {
        let fx = Fixture::new();
        let body = event_body(
            "evt_1",
            "checkout.session.completed",
            json!({"id": "cs_1", "payment_intent": "pi_123"}),
        );

        fx.deliver(&body).await.unwrap();

        assert_eq!(
            fx.payments.snapshot(fx.payment_id).unwrap().status,
            PaymentStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_metadata_fallback_resolves_ledger_entry() {
        let fx = Fixture::new();
        // Intent id unknown, but the intent metadata carries the ledger id
        let body = event_body(
            "evt_1",
            "payment_intent.succeeded",
            json!({
                "id": "pi_unseen",
                "metadata": { "paymentId": fx.payment_id.to_string() }
            }),
        );

        fx.deliver(&body).await.unwrap();

        assert_eq!(
            fx.payments.snapshot(fx.payment_id).unwrap().status,
            PaymentStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_unknown_event_type_is_logged_success() {
        let fx = Fixture::new();
        let body = event_body("evt_1", "invoice.paid", json!({"id": "in_1"}));

        fx.deliver(&body).await.unwrap();

        let log = fx.events.snapshot("evt_1").unwrap();
        assert!(log.processed);
        assert_eq!(log.event_type, "invoice.paid");
    }

    #[tokio::test]
    async fn test_malformed_envelope_rejected_after_signature() {
        let fx = Fixture::new();
        let body = br#"{"id":"evt_1"}"#;
        let header = sign(&fx.config.webhook_secret, body);

        let err = fx
            .reconciler()
            .execute(body, Some(&header))
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::InvalidPayload(_)));
        assert_eq!(fx.events.count(), 0);
    }

    #[tokio::test]
    async fn test_succeeded_without_kyc_does_not_activate() {
        let fx = Fixture::new();
        {
            let mut rows = fx.users.rows.lock().unwrap();
            rows[0].kyc_status = KycStatus::Pending;
        }
        let body = event_body("evt_1", "payment_intent.succeeded", json!({"id": "pi_123"}));

        fx.deliver(&body).await.unwrap();

        let user = fx.users.snapshot(fx.user_id).unwrap();
        assert!(user.has_paid);
        assert_eq!(user.account_status, AccountStatus::Pending);
        assert!(user.activated_at.is_none());
    }
}

mod create_intent_tests {
    use super::*;

    #[derive(Clone, Default)]
    struct RecordingGateway {
        calls: Arc<Mutex<Vec<(i64, String, Value)>>>,
    }

    impl PaymentGateway for RecordingGateway {
        async fn create_intent(
            &self,
            amount: i64,
            currency: &str,
            metadata: &Value,
        ) -> BillingResult<GatewayIntent> {
            self.calls
                .lock()
                .unwrap()
                .push((amount, currency.to_string(), metadata.clone()));
            Ok(GatewayIntent {
                intent_id: "pi_new".to_string(),
                client_secret: "pi_new_secret".to_string(),
            })
        }
    }

    fn input() -> CreateIntentInput {
        CreateIntentInput {
            amount: 125_000,
            currency: "usd".into(),
            asic_model: Some("S19".into()),
            quantity: Some(2),
            unit_price: Some(62_500),
            bundle_type: Some("premium".into()),
        }
    }

    #[tokio::test]
    async fn test_create_intent_records_pending_ledger_entry() {
        let payments = Arc::new(MemoryPayments::default());
        let gateway = Arc::new(RecordingGateway::default());
        let user = User::provision("auth0|buyer".into(), None);

        let output = CreateIntentUseCase::new(payments.clone(), gateway.clone())
            .execute(&user, input())
            .await
            .unwrap();

        assert_eq!(output.client_secret, "pi_new_secret");

        let payment = payments.snapshot(output.payment_id).unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.intent_id.as_deref(), Some("pi_new"));
        assert_eq!(payment.kind, PaymentKind::Purchase);
        assert_eq!(payment.description, "ASIC purchase: S19 x2");

        // The gateway metadata must carry the ledger id for the
        // reconciler's fallback lookup
        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].2["paymentId"],
            json!(output.payment_id.to_string())
        );
    }

    #[tokio::test]
    async fn test_create_intent_rejects_non_positive_amount() {
        let payments = Arc::new(MemoryPayments::default());
        let gateway = Arc::new(RecordingGateway::default());
        let user = User::provision("auth0|buyer".into(), None);

        let err = CreateIntentUseCase::new(payments, gateway.clone())
            .execute(&user, CreateIntentInput { amount: 0, ..input() })
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::InvalidPayload(_)));
        assert!(gateway.calls.lock().unwrap().is_empty());
    }
}

mod history_tests {
    use super::*;

    #[tokio::test]
    async fn test_history_filters_and_paginates() {
        let payments = Arc::new(MemoryPayments::default());
        let user_id = kernel::id::UserId::new();

        for i in 0..3 {
            let p = Payment::new_purchase(
                user_id,
                1000 + i,
                "usd".into(),
                format!("purchase {i}"),
                json!({}),
            );
            payments.insert(&p).await.unwrap();
        }

        let use_case = PaymentHistoryUseCase::new(payments.clone());
        let page = use_case
            .execute(*user_id.as_uuid(), Some("PURCHASE"), Some(1), Some(2))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 3);

        // Another user sees nothing
        let empty = use_case
            .execute(Uuid::new_v4(), None, None, None)
            .await
            .unwrap();
        assert!(empty.items.is_empty());
    }

    #[tokio::test]
    async fn test_history_rejects_unknown_type() {
        let payments = Arc::new(MemoryPayments::default());
        let err = PaymentHistoryUseCase::new(payments)
            .execute(Uuid::new_v4(), Some("CHARGEBACK"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::InvalidPayload(_)));
    }
}
