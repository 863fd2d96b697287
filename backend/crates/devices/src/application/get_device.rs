//! Get Device Use Case

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::AsicDevice;
use crate::domain::repository::DeviceRepository;
use crate::error::{DeviceError, DeviceResult};

/// Get device use case
pub struct GetDeviceUseCase<D>
where
    D: DeviceRepository,
{
    devices: Arc<D>,
}

impl<D> GetDeviceUseCase<D>
where
    D: DeviceRepository,
{
    pub fn new(devices: Arc<D>) -> Self {
        Self { devices }
    }

    pub async fn execute(&self, user_id: Uuid, device_id: Uuid) -> DeviceResult<AsicDevice> {
        self.devices
            .find_for_user(user_id, device_id)
            .await?
            .ok_or(DeviceError::DeviceNotFound)
    }
}
