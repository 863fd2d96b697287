//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::DevicePage;
use crate::domain::entity::AsicDevice;

/// Query for GET /api/devices
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub device_id: Uuid,
    pub serial: String,
    pub model: String,
    pub manufacturer: String,
    pub hashrate_ths: f64,
    pub power_watts: i32,
    pub efficiency_j_th: f64,
    pub algorithm: String,
    pub status: String,
    pub current_hashrate_ths: f64,
    pub temperature_c: f64,
    pub uptime_pct: f64,
    pub last_seen: DateTime<Utc>,
    pub total_earnings: f64,
    pub roi: f64,
    pub created_at: DateTime<Utc>,
}

impl From<AsicDevice> for DeviceResponse {
    fn from(device: AsicDevice) -> Self {
        let roi = device.roi();
        Self {
            device_id: device.device_id.into_uuid(),
            serial: device.serial,
            model: device.model,
            manufacturer: device.manufacturer,
            hashrate_ths: device.hashrate_ths,
            power_watts: device.power_watts,
            efficiency_j_th: device.efficiency_j_th,
            algorithm: device.algorithm,
            status: device.status.code().to_string(),
            current_hashrate_ths: device.current_hashrate_ths,
            temperature_c: device.temperature_c,
            uptime_pct: device.uptime_pct,
            last_seen: device.last_seen,
            total_earnings: device.total_earnings,
            roi,
            created_at: device.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// Response for GET /api/devices
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub asics: Vec<DeviceResponse>,
    pub pagination: Pagination,
}

impl From<DevicePage> for ListResponse {
    fn from(page: DevicePage) -> Self {
        Self {
            asics: page.items.into_iter().map(DeviceResponse::from).collect(),
            pagination: Pagination {
                page: page.page,
                limit: page.limit,
                total: page.total,
            },
        }
    }
}

/// Request for PUT /api/devices/{device_id}/status
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Response for PUT /api/devices/{device_id}/status
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusResponse {
    pub message: String,
    pub asic: DeviceResponse,
}
