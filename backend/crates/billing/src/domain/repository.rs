//! Repository and Gateway Traits

use serde_json::Value;
use uuid::Uuid;

use crate::domain::entity::Payment;
use crate::domain::event::PaymentEventLog;
use crate::domain::value_object::PaymentKind;
use crate::error::BillingResult;
use kernel::store::InsertOutcome;

/// Payment ledger persistence
#[trait_variant::make(PaymentRepository: Send)]
pub trait LocalPaymentRepository {
    async fn insert(&self, payment: &Payment) -> BillingResult<()>;

    async fn find_by_intent_id(&self, intent_id: &str) -> BillingResult<Option<Payment>>;

    async fn find_by_id(&self, payment_id: Uuid) -> BillingResult<Option<Payment>>;

    async fn update(&self, payment: &Payment) -> BillingResult<()>;

    /// Page of the user's ledger entries, newest first, with total count
    async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<PaymentKind>,
        page: u32,
        limit: u32,
    ) -> BillingResult<(Vec<Payment>, u64)>;
}

/// Provider event log persistence
///
/// Rows are append-only; only the outcome fields (`processed`, `error`)
/// are ever written after the insert.
#[trait_variant::make(PaymentEventLogRepository: Send)]
pub trait LocalPaymentEventLogRepository {
    /// Insert keyed by event id; a concurrent duplicate surfaces as
    /// `AlreadyExists`, never as an error
    async fn insert_if_absent(&self, entry: &PaymentEventLog) -> BillingResult<InsertOutcome>;

    async fn find(&self, event_id: &str) -> BillingResult<Option<PaymentEventLog>>;

    async fn mark_processed(&self, event_id: &str) -> BillingResult<()>;

    async fn mark_failed(&self, event_id: &str, error: &str) -> BillingResult<()>;

    /// Page of the log, newest first, with total count
    async fn list(&self, page: u32, limit: u32) -> BillingResult<(Vec<PaymentEventLog>, u64)>;
}

/// Intent created at the payment provider
#[derive(Debug, Clone)]
pub struct GatewayIntent {
    pub intent_id: String,
    pub client_secret: String,
}

/// Opaque payment provider
///
/// Only intent creation crosses the network; the reconciler itself never
/// calls out.
#[trait_variant::make(PaymentGateway: Send)]
pub trait LocalPaymentGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        metadata: &Value,
    ) -> BillingResult<GatewayIntent>;
}
