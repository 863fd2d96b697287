//! Payment Provider Client
//!
//! Thin reqwest client for the provider's intent-creation endpoint. The
//! API speaks form encoding; metadata keys are flattened to
//! `metadata[key]` fields.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::repository::{GatewayIntent, PaymentGateway};
use crate::error::{BillingError, BillingResult};

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Stripe-backed payment gateway
#[derive(Clone)]
pub struct StripeGateway {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeGateway {
    pub fn new(secret_key: String) -> Self {
        Self::with_api_base(secret_key, DEFAULT_API_BASE.to_string())
    }

    /// Point the client at a different base URL (test doubles)
    pub fn with_api_base(secret_key: String, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            api_base,
        }
    }
}

#[derive(Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: String,
}

impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        metadata: &Value,
    ) -> BillingResult<GatewayIntent> {
        let mut form: Vec<(String, String)> = vec![
            ("amount".to_string(), amount.to_string()),
            ("currency".to_string(), currency.to_string()),
        ];

        if let Some(object) = metadata.as_object() {
            for (key, value) in object {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => continue,
                    other => other.to_string(),
                };
                form.push((format!("metadata[{key}]"), text));
            }
        }

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(|e| BillingError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Intent creation rejected");
            return Err(BillingError::Provider(format!(
                "intent creation failed with status {status}"
            )));
        }

        let intent: IntentResponse = response
            .json()
            .await
            .map_err(|e| BillingError::Provider(e.to_string()))?;

        Ok(GatewayIntent {
            intent_id: intent.id,
            client_secret: intent.client_secret,
        })
    }
}
