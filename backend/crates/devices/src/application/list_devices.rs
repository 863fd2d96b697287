//! List Devices Use Case

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::AsicDevice;
use crate::domain::repository::DeviceRepository;
use crate::error::DeviceResult;

const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of a user's devices, newest first
#[derive(Debug, Clone)]
pub struct DevicePage {
    pub items: Vec<AsicDevice>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// List devices use case
pub struct ListDevicesUseCase<D>
where
    D: DeviceRepository,
{
    devices: Arc<D>,
}

impl<D> ListDevicesUseCase<D>
where
    D: DeviceRepository,
{
    pub fn new(devices: Arc<D>) -> Self {
        Self { devices }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> DeviceResult<DevicePage> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let (items, total) = self.devices.list_for_user(user_id, page, limit).await?;

        Ok(DevicePage {
            items,
            page,
            limit,
            total,
        })
    }
}
