//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use std::sync::Arc;

use accounts::{AuthSubject, ProvisionUserUseCase, UserRepository};

use crate::application::config::BillingConfig;
use crate::application::{
    CreateIntentInput, CreateIntentUseCase, ListEventsUseCase, PaymentHistoryUseCase,
    ReconcileEventUseCase,
};
use crate::domain::repository::{PaymentEventLogRepository, PaymentGateway, PaymentRepository};
use crate::error::{BillingError, BillingResult};
use crate::presentation::dto::{
    CreateIntentRequest, CreateIntentResponse, EventsQuery, EventsResponse, HistoryQuery,
    HistoryResponse, WebhookAck,
};

/// Header carrying the provider's webhook signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";
/// Header carrying the shared admin token
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Shared state for billing handlers
#[derive(Clone)]
pub struct BillingAppState<P, L, U, G>
where
    P: PaymentRepository + Clone + Send + Sync + 'static,
    L: PaymentEventLogRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    pub payments: Arc<P>,
    pub events: Arc<L>,
    pub users: Arc<U>,
    pub gateway: Arc<G>,
    pub config: Arc<BillingConfig>,
}

/// POST /api/billing/webhooks/stripe
///
/// Raw-body endpoint: the signature covers the exact bytes on the wire,
/// so no JSON extractor may touch the body first.
pub async fn stripe_webhook<P, L, U, G>(
    State(state): State<BillingAppState<P, L, U, G>>,
    headers: HeaderMap,
    body: Bytes,
) -> BillingResult<Json<WebhookAck>>
where
    P: PaymentRepository + Clone + Send + Sync + 'static,
    L: PaymentEventLogRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    ReconcileEventUseCase::new(
        state.payments.clone(),
        state.events.clone(),
        state.users.clone(),
        state.config.clone(),
    )
    .execute(&body, signature)
    .await?;

    Ok(Json(WebhookAck { received: true }))
}

/// POST /api/billing/intent
pub async fn create_intent<P, L, U, G>(
    State(state): State<BillingAppState<P, L, U, G>>,
    auth: AuthSubject,
    Json(req): Json<CreateIntentRequest>,
) -> BillingResult<Json<CreateIntentResponse>>
where
    P: PaymentRepository + Clone + Send + Sync + 'static,
    L: PaymentEventLogRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    let user = ProvisionUserUseCase::new(state.users.clone())
        .execute(&auth.subject, auth.email.clone())
        .await?;

    let output = CreateIntentUseCase::new(state.payments.clone(), state.gateway.clone())
        .execute(
            &user,
            CreateIntentInput {
                amount: req.amount,
                currency: req.currency,
                asic_model: req.asic_model,
                quantity: req.quantity,
                unit_price: req.unit_price,
                bundle_type: req.bundle_type,
            },
        )
        .await?;

    Ok(Json(CreateIntentResponse {
        client_secret: output.client_secret,
        payment_id: output.payment_id,
    }))
}

/// GET /api/billing/history
pub async fn payment_history<P, L, U, G>(
    State(state): State<BillingAppState<P, L, U, G>>,
    auth: AuthSubject,
    Query(query): Query<HistoryQuery>,
) -> BillingResult<Json<HistoryResponse>>
where
    P: PaymentRepository + Clone + Send + Sync + 'static,
    L: PaymentEventLogRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    let user = ProvisionUserUseCase::new(state.users.clone())
        .execute(&auth.subject, auth.email.clone())
        .await?;

    let page = PaymentHistoryUseCase::new(state.payments.clone())
        .execute(
            *user.user_id.as_uuid(),
            query.kind.as_deref(),
            query.page,
            query.limit,
        )
        .await?;

    Ok(Json(HistoryResponse::from(page)))
}

/// GET /api/billing/events
pub async fn list_events<P, L, U, G>(
    State(state): State<BillingAppState<P, L, U, G>>,
    headers: HeaderMap,
    Query(query): Query<EventsQuery>,
) -> BillingResult<Json<EventsResponse>>
where
    P: PaymentRepository + Clone + Send + Sync + 'static,
    L: PaymentEventLogRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    authorize_admin(&state.config, &headers)?;

    let page = ListEventsUseCase::new(state.events.clone())
        .execute(query.page, query.limit)
        .await?;

    Ok(Json(EventsResponse::from(page)))
}

/// Check the shared admin token; a missing configured token locks admin
/// endpoints out entirely
fn authorize_admin(config: &BillingConfig, headers: &HeaderMap) -> BillingResult<()> {
    let expected = config
        .admin_token
        .as_deref()
        .ok_or(BillingError::AdminAccessDenied)?;

    let supplied = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(BillingError::AdminAccessDenied)?;

    if platform::crypto::constant_time_eq(expected.as_bytes(), supplied.as_bytes()) {
        Ok(())
    } else {
        Err(BillingError::AdminAccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config_with_token(token: &str) -> BillingConfig {
        BillingConfig {
            webhook_secret: "whsec".into(),
            signature_tolerance_secs: 300,
            admin_token: Some(token.to_string()),
        }
    }

    #[test]
    fn test_authorize_admin_accepts_matching_token() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static("sekrit"));
        assert!(authorize_admin(&config_with_token("sekrit"), &headers).is_ok());
    }

    #[test]
    fn test_authorize_admin_rejects_wrong_token() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static("nope"));
        assert!(authorize_admin(&config_with_token("sekrit"), &headers).is_err());
    }

    #[test]
    fn test_authorize_admin_locked_without_config() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static("anything"));
        let config = BillingConfig {
            admin_token: None,
            ..config_with_token("unused")
        };
        assert!(authorize_admin(&config, &headers).is_err());
    }
}
