//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User aggregate, value objects, activation policy, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Invariants
//! - `AccountStatus::Active` is reachable only through the activation policy
//!   (KYC approved AND payment completed); the admin override rejects it
//! - User rows are never hard-deleted; closure is a soft state
//! - Every user write is a compare-and-set on the `version` column

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use application::{GetProfileUseCase, OverrideStatusUseCase, ProvisionUserUseCase};
pub use domain::activation::{ActivationService, activation_decision};
pub use domain::entity::{User, VerificationRecord};
pub use domain::repository::UserRepository;
pub use domain::value_object::{AccountStatus, KycStatus, PlanTier, UserRole};
pub use error::{AccountError, AccountResult};
pub use infra::postgres::PgAccountRepository;
pub use presentation::middleware::AuthSubject;
pub use presentation::router::accounts_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
