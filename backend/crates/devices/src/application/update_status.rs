//! Update Device Status Use Case
//!
//! Owner-scoped status change: the repository write carries the user id,
//! so a device belonging to someone else is indistinguishable from an
//! unknown one.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entity::AsicDevice;
use crate::domain::repository::DeviceRepository;
use crate::domain::value_object::DeviceStatus;
use crate::error::{DeviceError, DeviceResult};

/// Update device status use case
pub struct UpdateDeviceStatusUseCase<D>
where
    D: DeviceRepository,
{
    devices: Arc<D>,
}

impl<D> UpdateDeviceStatusUseCase<D>
where
    D: DeviceRepository,
{
    pub fn new(devices: Arc<D>) -> Self {
        Self { devices }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        device_id: Uuid,
        status_label: &str,
    ) -> DeviceResult<AsicDevice> {
        let status = DeviceStatus::from_label(status_label)
            .ok_or_else(|| DeviceError::InvalidStatus(status_label.to_string()))?;

        let updated = self
            .devices
            .update_status(user_id, device_id, status, Utc::now())
            .await?
            .ok_or(DeviceError::DeviceNotFound)?;

        tracing::info!(
            device_id = %device_id,
            status = %status,
            "Device status updated"
        );

        Ok(updated)
    }
}
