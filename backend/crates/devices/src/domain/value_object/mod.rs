//! Value Objects

pub mod device_status;

pub use device_status::DeviceStatus;
