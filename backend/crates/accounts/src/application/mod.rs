//! Application Layer - Use Cases

pub mod config;
pub mod get_profile;
pub mod override_status;
pub mod provision_user;

pub use get_profile::GetProfileUseCase;
pub use override_status::OverrideStatusUseCase;
pub use provision_user::ProvisionUserUseCase;
