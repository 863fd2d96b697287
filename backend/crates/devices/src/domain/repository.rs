//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entity::AsicDevice;
use crate::domain::value_object::DeviceStatus;
use crate::error::DeviceResult;

/// Device repository trait
///
/// Every read and write is scoped by owner: a device id belonging to a
/// different user behaves exactly like an unknown id.
#[trait_variant::make(DeviceRepository: Send)]
pub trait LocalDeviceRepository {
    async fn insert(&self, device: &AsicDevice) -> DeviceResult<()>;

    /// Find a device owned by this user
    async fn find_for_user(
        &self,
        user_id: Uuid,
        device_id: Uuid,
    ) -> DeviceResult<Option<AsicDevice>>;

    /// Newest-first page of the user's devices, with the total count
    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> DeviceResult<(Vec<AsicDevice>, u64)>;

    /// Set the status of a device owned by this user, stamping
    /// `last_seen`. Returns the updated record, or `None` when no owned
    /// device matches.
    async fn update_status(
        &self,
        user_id: Uuid,
        device_id: Uuid,
        status: DeviceStatus,
        last_seen: DateTime<Utc>,
    ) -> DeviceResult<Option<AsicDevice>>;
}
