//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{DeviceId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::AsicDevice;
use crate::domain::repository::DeviceRepository;
use crate::domain::value_object::DeviceStatus;
use crate::error::{DeviceError, DeviceResult};

const DEVICE_COLUMNS: &str = r#"
    device_id,
    user_id,
    serial,
    model,
    manufacturer,
    hashrate_ths,
    power_watts,
    efficiency_j_th,
    algorithm,
    status,
    current_hashrate_ths,
    temperature_c,
    uptime_pct,
    last_seen,
    total_earnings,
    purchase_price,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed device repository
#[derive(Clone)]
pub struct PgDeviceRepository {
    pool: PgPool,
}

impl PgDeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for PgDeviceRepository {
    async fn insert(&self, device: &AsicDevice) -> DeviceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO asic_devices (
                device_id, user_id, serial, model, manufacturer,
                hashrate_ths, power_watts, efficiency_j_th, algorithm, status,
                current_hashrate_ths, temperature_c, uptime_pct, last_seen,
                total_earnings, purchase_price, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                      $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(device.device_id.as_uuid())
        .bind(device.user_id.as_uuid())
        .bind(&device.serial)
        .bind(&device.model)
        .bind(&device.manufacturer)
        .bind(device.hashrate_ths)
        .bind(device.power_watts)
        .bind(device.efficiency_j_th)
        .bind(&device.algorithm)
        .bind(device.status.code())
        .bind(device.current_hashrate_ths)
        .bind(device.temperature_c)
        .bind(device.uptime_pct)
        .bind(device.last_seen)
        .bind(device.total_earnings)
        .bind(device.purchase_price)
        .bind(device.created_at)
        .bind(device.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_for_user(
        &self,
        user_id: Uuid,
        device_id: Uuid,
    ) -> DeviceResult<Option<AsicDevice>> {
        let row = sqlx::query_as::<_, DeviceRow>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM asic_devices WHERE device_id = $1 AND user_id = $2"
        ))
        .bind(device_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DeviceRow::into_device).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> DeviceResult<(Vec<AsicDevice>, u64)> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);

        let rows = sqlx::query_as::<_, DeviceRow>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM asic_devices \
             WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM asic_devices WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(DeviceRow::into_device)
            .collect::<DeviceResult<Vec<_>>>()?;

        Ok((items, total as u64))
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        device_id: Uuid,
        status: DeviceStatus,
        last_seen: DateTime<Utc>,
    ) -> DeviceResult<Option<AsicDevice>> {
        let row = sqlx::query_as::<_, DeviceRow>(&format!(
            "UPDATE asic_devices SET status = $3, last_seen = $4, updated_at = $4 \
             WHERE device_id = $1 AND user_id = $2 \
             RETURNING {DEVICE_COLUMNS}"
        ))
        .bind(device_id)
        .bind(user_id)
        .bind(status.code())
        .bind(last_seen)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DeviceRow::into_device).transpose()
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct DeviceRow {
    device_id: Uuid,
    user_id: Uuid,
    serial: String,
    model: String,
    manufacturer: String,
    hashrate_ths: f64,
    power_watts: i32,
    efficiency_j_th: f64,
    algorithm: String,
    status: String,
    current_hashrate_ths: f64,
    temperature_c: f64,
    uptime_pct: f64,
    last_seen: DateTime<Utc>,
    total_earnings: f64,
    purchase_price: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DeviceRow {
    fn into_device(self) -> DeviceResult<AsicDevice> {
        Ok(AsicDevice {
            device_id: DeviceId::from_uuid(self.device_id),
            user_id: UserId::from_uuid(self.user_id),
            serial: self.serial,
            model: self.model,
            manufacturer: self.manufacturer,
            hashrate_ths: self.hashrate_ths,
            power_watts: self.power_watts,
            efficiency_j_th: self.efficiency_j_th,
            algorithm: self.algorithm,
            status: DeviceStatus::from_code(&self.status).ok_or_else(|| {
                DeviceError::Internal(format!("unknown device status: {}", self.status))
            })?,
            current_hashrate_ths: self.current_hashrate_ths,
            temperature_c: self.temperature_c,
            uptime_pct: self.uptime_pct,
            last_seen: self.last_seen,
            total_earnings: self.total_earnings,
            purchase_price: self.purchase_price,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
