//! Billing Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Payment ledger, provider event envelope/log, signature
//!   verification, repository traits
//! - `application/` - Use cases (webhook reconciler, intent creation,
//!   history, event log reads)
//! - `infra/` - Database implementations and the provider client
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Invariants
//! - At most one ledger entry per provider intent id
//! - Ledger transitions are idempotent; a completed entry is never
//!   re-stamped or regressed
//! - Every inbound delivery leaves an event log row recording its fate;
//!   `processed == true` is the dedup gate for redelivery
//! - Unverified webhook payloads are never persisted

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::BillingConfig;
pub use application::{
    CreateIntentInput, CreateIntentOutput, CreateIntentUseCase, ListEventsUseCase,
    PaymentHistoryUseCase, ReconcileEventUseCase,
};
pub use domain::entity::Payment;
pub use domain::event::{EventEnvelope, PaymentEventKind, PaymentEventLog};
pub use domain::repository::{
    GatewayIntent, PaymentEventLogRepository, PaymentGateway, PaymentRepository,
};
pub use domain::value_object::{PaymentKind, PaymentStatus};
pub use error::{BillingError, BillingResult};
pub use infra::postgres::{PgPaymentEventLogRepository, PgPaymentRepository};
pub use infra::stripe::StripeGateway;
pub use presentation::router::billing_router;

#[cfg(test)]
mod tests;
