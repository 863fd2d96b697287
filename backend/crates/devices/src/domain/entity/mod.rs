//! Domain Entities

pub mod device;

pub use device::AsicDevice;
