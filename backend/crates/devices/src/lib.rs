//! Devices Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - ASIC device record, status value object, repository trait
//! - `application/` - Use cases (listing, detail read, status update)
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Invariants
//! - Every read and write is scoped by owner; another user's device id
//!   behaves like an unknown one
//! - Vendor serials are unique across the fleet

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    DevicePage, GetDeviceUseCase, ListDevicesUseCase, UpdateDeviceStatusUseCase,
};
pub use domain::entity::AsicDevice;
pub use domain::repository::DeviceRepository;
pub use domain::value_object::DeviceStatus;
pub use error::{DeviceError, DeviceResult};
pub use infra::postgres::PgDeviceRepository;
pub use presentation::router::devices_router;
