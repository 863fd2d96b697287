//! Application Layer - Use Cases

pub mod get_device;
pub mod list_devices;
pub mod update_status;

pub use get_device::GetDeviceUseCase;
pub use list_devices::{DevicePage, ListDevicesUseCase};
pub use update_status::UpdateDeviceStatusUseCase;
