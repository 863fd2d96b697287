//! Create Intent Use Case
//!
//! Initiates a purchase: asks the payment provider for an intent, then
//! records a PENDING ledger entry linked to it. The intent metadata
//! carries the internal ledger id so the reconciler can fall back to it
//! when an event arrives without a resolvable intent id.

use std::sync::Arc;

use accounts::User;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entity::Payment;
use crate::domain::repository::{PaymentGateway, PaymentRepository};
use crate::error::{BillingError, BillingResult};

/// Purchase parameters supplied by the client
#[derive(Debug, Clone)]
pub struct CreateIntentInput {
    /// Minor units
    pub amount: i64,
    pub currency: String,
    pub asic_model: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<i64>,
    pub bundle_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateIntentOutput {
    pub client_secret: String,
    pub payment_id: Uuid,
}

/// Create intent use case
pub struct CreateIntentUseCase<P, G>
where
    P: PaymentRepository,
    G: PaymentGateway,
{
    payments: Arc<P>,
    gateway: Arc<G>,
}

impl<P, G> CreateIntentUseCase<P, G>
where
    P: PaymentRepository,
    G: PaymentGateway,
{
    pub fn new(payments: Arc<P>, gateway: Arc<G>) -> Self {
        Self { payments, gateway }
    }

    pub async fn execute(
        &self,
        user: &User,
        input: CreateIntentInput,
    ) -> BillingResult<CreateIntentOutput> {
        if input.amount <= 0 {
            return Err(BillingError::InvalidPayload(
                "amount must be positive".to_string(),
            ));
        }
        if input.currency.trim().is_empty() {
            return Err(BillingError::InvalidPayload(
                "currency is required".to_string(),
            ));
        }

        let description = match (&input.asic_model, input.quantity) {
            (Some(model), Some(quantity)) => format!("ASIC purchase: {model} x{quantity}"),
            (Some(model), None) => format!("ASIC purchase: {model}"),
            _ => "Mining plan purchase".to_string(),
        };

        let metadata = json!({
            "subject": user.subject,
            "asicModel": input.asic_model,
            "quantity": input.quantity,
            "unitPrice": input.unit_price,
            "bundleType": input.bundle_type,
        });

        let mut payment = Payment::new_purchase(
            user.user_id,
            input.amount,
            input.currency.clone(),
            description,
            metadata,
        );

        // The reconciler's metadata fallback resolves this id
        let intent_metadata = json!({
            "subject": user.subject,
            "paymentId": payment.payment_id.to_string(),
            "bundleType": input.bundle_type,
        });

        let intent = self
            .gateway
            .create_intent(input.amount, &input.currency, &intent_metadata)
            .await?;

        payment.attach_intent(intent.intent_id);
        self.payments.insert(&payment).await?;

        tracing::info!(
            payment_id = %payment.payment_id,
            user_id = %payment.user_id,
            amount = payment.amount,
            "Payment intent created"
        );

        Ok(CreateIntentOutput {
            client_secret: intent.client_secret,
            payment_id: payment.payment_id.into_uuid(),
        })
    }
}
