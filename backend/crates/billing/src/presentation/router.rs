//! Billing Router

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::PgPool;
use std::sync::Arc;

use accounts::{PgAccountRepository, UserRepository};

use crate::application::config::BillingConfig;
use crate::domain::repository::{PaymentEventLogRepository, PaymentGateway, PaymentRepository};
use crate::infra::postgres::{PgPaymentEventLogRepository, PgPaymentRepository};
use crate::infra::stripe::StripeGateway;
use crate::presentation::handlers::{self, BillingAppState};

/// Create the billing router with PostgreSQL repositories
pub fn billing_router(pool: PgPool, gateway: StripeGateway, config: BillingConfig) -> Router {
    billing_router_generic(
        PgPaymentRepository::new(pool.clone()),
        PgPaymentEventLogRepository::new(pool.clone()),
        PgAccountRepository::new(pool),
        gateway,
        config,
    )
}

/// Create a generic billing router for any repository implementations
pub fn billing_router_generic<P, L, U, G>(
    payments: P,
    events: L,
    users: U,
    gateway: G,
    config: BillingConfig,
) -> Router
where
    P: PaymentRepository + Clone + Send + Sync + 'static,
    L: PaymentEventLogRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    let state = BillingAppState {
        payments: Arc::new(payments),
        events: Arc::new(events),
        users: Arc::new(users),
        gateway: Arc::new(gateway),
        config: Arc::new(config),
    };

    Router::new()
        .route("/webhooks/stripe", post(handlers::stripe_webhook::<P, L, U, G>))
        .route("/intent", post(handlers::create_intent::<P, L, U, G>))
        .route("/history", get(handlers::payment_history::<P, L, U, G>))
        .route("/events", get(handlers::list_events::<P, L, U, G>))
        .with_state(state)
}
