//! Verify Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Identity event log, provider status mapping, repository
//!   and provider traits
//! - `application/` - Use cases (webhook reconciler, session lifecycle,
//!   completion tracking, status read)
//! - `infra/` - Database implementations and the provider client
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Invariants
//! - Every inbound delivery is logged before any state change, and the
//!   log row records its fate
//! - A completion event is applied only to the user whose current scan
//!   reference matches
//! - A new session may start only from PENDING or REJECTED; an in-flight
//!   scan reference is never overwritten
//! - Superseded verification records are archived, never deleted

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::VerifyConfig;
pub use application::{
    KycStatusUseCase, ReconcileIdentityEventUseCase, StartKycSessionUseCase, StartSessionInput,
    TrackCompletionUseCase, TrackOutcome,
};
pub use domain::event::{IdentityEventLog, map_provider_status};
pub use domain::repository::{
    IdentityEventLogRepository, IdentitySession, IdentitySessionProvider, KycTrackingRepository,
    SessionRequest,
};
pub use error::{VerifyError, VerifyResult};
pub use infra::idenfy::IdenfyProvider;
pub use infra::postgres::{PgIdentityEventLogRepository, PgKycTrackingRepository};
pub use presentation::router::verify_router;

#[cfg(test)]
mod tests;
