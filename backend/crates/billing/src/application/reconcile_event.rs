//! Payment Webhook Reconciler
//!
//! Verifies the provider signature, logs the delivery, applies the ledger
//! mutation for the event kind, and evaluates account activation. The
//! write order is log-then-process: a crash after the ledger mutation but
//! before the outcome write leaves an unprocessed log row, and the
//! provider's retry re-runs the (idempotent) mutation. The dedup gate is
//! therefore `processed == true`, not row existence.

use std::sync::Arc;

use accounts::{ActivationService, PlanTier, UserRepository};
use chrono::Utc;
use kernel::store::InsertOutcome;
use serde_json::Value;
use uuid::Uuid;

use crate::application::config::BillingConfig;
use crate::domain::entity::Payment;
use crate::domain::event::{EventEnvelope, PaymentEventKind, PaymentEventLog};
use crate::domain::repository::{PaymentEventLogRepository, PaymentRepository};
use crate::domain::signature;
use crate::error::{BillingError, BillingResult};

const MAX_USER_WRITE_ATTEMPTS: u32 = 3;

/// Payment webhook reconciler use case
pub struct ReconcileEventUseCase<P, L, U>
where
    P: PaymentRepository,
    L: PaymentEventLogRepository,
    U: UserRepository,
{
    payments: Arc<P>,
    events: Arc<L>,
    users: Arc<U>,
    config: Arc<BillingConfig>,
}

impl<P, L, U> ReconcileEventUseCase<P, L, U>
where
    P: PaymentRepository,
    L: PaymentEventLogRepository,
    U: UserRepository,
{
    pub fn new(payments: Arc<P>, events: Arc<L>, users: Arc<U>, config: Arc<BillingConfig>) -> Self {
        Self {
            payments,
            events,
            users,
            config,
        }
    }

    /// Reconcile one inbound delivery
    ///
    /// `Ok(())` means the provider should see 2xx, including the
    /// duplicate-delivery case.
    pub async fn execute(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> BillingResult<()> {
        let header = signature_header.ok_or(BillingError::InvalidSignature)?;
        let verified = signature::verify(
            self.config.webhook_secret.as_bytes(),
            raw_body,
            header,
            Utc::now().timestamp(),
            self.config.signature_tolerance_secs,
        );
        if !verified {
            // Unverified payloads are not trusted enough to persist
            return Err(BillingError::InvalidSignature);
        }

        let envelope: EventEnvelope = serde_json::from_slice(raw_body)
            .map_err(|e| BillingError::InvalidPayload(e.to_string()))?;

        let entry = PaymentEventLog::new(
            envelope.id.clone(),
            envelope.event_type.clone(),
            envelope.data.object.clone(),
        );
        match self.events.insert_if_absent(&entry).await? {
            InsertOutcome::Inserted => {}
            InsertOutcome::AlreadyExists => {
                let processed = self
                    .events
                    .find(&envelope.id)
                    .await?
                    .map(|existing| existing.processed)
                    .unwrap_or(false);
                if processed {
                    tracing::info!(event_id = %envelope.id, "Duplicate event delivery, skipping");
                    return Ok(());
                }
                // Seen but never applied: the earlier attempt failed, re-run it
                tracing::warn!(event_id = %envelope.id, "Retrying previously failed event");
            }
        }

        match self.dispatch(&envelope).await {
            Ok(()) => {
                self.events.mark_processed(&envelope.id).await?;
                tracing::info!(
                    event_id = %envelope.id,
                    event_type = %envelope.event_type,
                    "Payment event processed"
                );
                Ok(())
            }
            Err(err) => {
                // The audit trail must show this delivery's fate before
                // the error reaches the provider
                self.events.mark_failed(&envelope.id, &err.to_string()).await?;
                Err(err)
            }
        }
    }

    async fn dispatch(&self, envelope: &EventEnvelope) -> BillingResult<()> {
        let object = &envelope.data.object;
        match envelope.kind() {
            PaymentEventKind::IntentSucceeded => self.on_intent_succeeded(object).await,
            PaymentEventKind::IntentFailed => self.on_intent_failed(object).await,
            PaymentEventKind::ChargeSucceeded => self.on_charge_outcome(object, true).await,
            PaymentEventKind::ChargeFailed => self.on_charge_outcome(object, false).await,
            PaymentEventKind::CheckoutCompleted => self.on_checkout_completed(object).await,
            PaymentEventKind::Unknown(event_type) => {
                tracing::info!(event_type = %event_type, "Unhandled payment event type");
                Ok(())
            }
        }
    }

    async fn on_intent_succeeded(&self, object: &Value) -> BillingResult<()> {
        let mut payment = self
            .find_by_intent_object(object)
            .await?
            .ok_or(BillingError::LedgerEntryNotFound)?;

        if payment.complete(Utc::now()) {
            self.payments.update(&payment).await?;
        }

        let plan = object
            .pointer("/metadata/bundleType")
            .and_then(Value::as_str)
            .map(PlanTier::from_bundle_label)
            .unwrap_or(PlanTier::Standard);

        let user_id = *payment.user_id.as_uuid();
        self.mark_user_paid(user_id, plan).await?;

        ActivationService::new(self.users.clone())
            .maybe_activate(user_id)
            .await?;
        Ok(())
    }

    async fn on_intent_failed(&self, object: &Value) -> BillingResult<()> {
        let mut payment = self
            .find_by_intent_object(object)
            .await?
            .ok_or(BillingError::LedgerEntryNotFound)?;

        let reason = object
            .pointer("/last_payment_error/message")
            .and_then(Value::as_str)
            .map(str::to_string);

        if payment.fail(reason) {
            self.payments.update(&payment).await?;
        }
        Ok(())
    }

    /// `charge.*` events carry the intent in `payment_intent`; a charge
    /// with no matching ledger entry is a silent no-op
    async fn on_charge_outcome(&self, object: &Value, succeeded: bool) -> BillingResult<()> {
        let Some(mut payment) = self.find_by_charge_object(object).await? else {
            tracing::debug!("Charge event matched no ledger entry, ignoring");
            return Ok(());
        };

        let changed = if succeeded {
            payment.complete(Utc::now())
        } else {
            let reason = object
                .get("failure_message")
                .and_then(Value::as_str)
                .map(str::to_string);
            payment.fail(reason)
        };

        if changed {
            self.payments.update(&payment).await?;
        }
        Ok(())
    }

    async fn on_checkout_completed(&self, object: &Value) -> BillingResult<()> {
        let Some(mut payment) = self.find_by_charge_object(object).await? else {
            tracing::debug!("Checkout session matched no ledger entry, ignoring");
            return Ok(());
        };

        if payment.complete(Utc::now()) {
            self.payments.update(&payment).await?;
        }
        Ok(())
    }

    /// Intent objects: lookup by the object's own id, falling back to the
    /// internal ledger id carried in the intent metadata
    async fn find_by_intent_object(&self, object: &Value) -> BillingResult<Option<Payment>> {
        if let Some(intent_id) = object.get("id").and_then(Value::as_str)
            && let Some(payment) = self.payments.find_by_intent_id(intent_id).await?
        {
            return Ok(Some(payment));
        }
        self.find_by_metadata_id(object).await
    }

    /// Charge/checkout objects: the intent lives in `payment_intent`
    async fn find_by_charge_object(&self, object: &Value) -> BillingResult<Option<Payment>> {
        if let Some(intent_id) = object.get("payment_intent").and_then(Value::as_str)
            && let Some(payment) = self.payments.find_by_intent_id(intent_id).await?
        {
            return Ok(Some(payment));
        }
        self.find_by_metadata_id(object).await
    }

    async fn find_by_metadata_id(&self, object: &Value) -> BillingResult<Option<Payment>> {
        let Some(payment_id) = object
            .pointer("/metadata/paymentId")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Uuid>().ok())
        else {
            return Ok(None);
        };
        self.payments.find_by_id(payment_id).await
    }

    /// Mark the owning user paid and adopt the purchased plan, with
    /// bounded CAS retries
    async fn mark_user_paid(&self, user_id: Uuid, plan: PlanTier) -> BillingResult<()> {
        for _ in 0..MAX_USER_WRITE_ATTEMPTS {
            let mut user = self
                .users
                .find_by_id(user_id)
                .await?
                .ok_or(BillingError::Account(accounts::AccountError::UserNotFound))?;

            if user.has_paid && user.plan == plan {
                return Ok(());
            }

            user.record_payment(plan);

            if self.users.update(&user).await? {
                tracing::info!(user_id = %user_id, plan = %plan, "User marked as paid");
                return Ok(());
            }
        }

        Err(BillingError::Account(
            accounts::AccountError::ActivationConflict,
        ))
    }
}
