//! Value Objects

pub mod account_status;
pub mod kyc_status;
pub mod plan_tier;
pub mod user_role;

pub use account_status::AccountStatus;
pub use kyc_status::KycStatus;
pub use plan_tier::PlanTier;
pub use user_role::UserRole;
