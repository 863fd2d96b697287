//! ASIC Device Entity
//!
//! One hosted mining unit owned by a user. Rated specifications come
//! from the vendor at registration; the performance snapshot is updated
//! by telemetry and by status changes.

use chrono::{DateTime, Utc};
use kernel::id::{DeviceId, UserId};

use crate::domain::value_object::DeviceStatus;

/// ASIC device record
#[derive(Debug, Clone)]
pub struct AsicDevice {
    pub device_id: DeviceId,
    pub user_id: UserId,
    /// Vendor serial, unique across the fleet
    pub serial: String,
    pub model: String,
    pub manufacturer: String,
    /// Rated hashrate in TH/s
    pub hashrate_ths: f64,
    /// Rated draw in watts
    pub power_watts: i32,
    /// Rated efficiency in J/TH
    pub efficiency_j_th: f64,
    pub algorithm: String,
    pub status: DeviceStatus,
    /// Telemetry snapshot
    pub current_hashrate_ths: f64,
    pub temperature_c: f64,
    pub uptime_pct: f64,
    pub last_seen: DateTime<Utc>,
    /// Lifetime earnings attributed to this unit
    pub total_earnings: f64,
    pub purchase_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AsicDevice {
    /// Register a new unit with its rated specifications
    pub fn register(
        user_id: UserId,
        serial: String,
        model: String,
        manufacturer: String,
        hashrate_ths: f64,
        power_watts: i32,
        efficiency_j_th: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            device_id: DeviceId::new(),
            user_id,
            serial,
            model,
            manufacturer,
            hashrate_ths,
            power_watts,
            efficiency_j_th,
            algorithm: "SHA-256".to_string(),
            status: DeviceStatus::default(),
            current_hashrate_ths: 0.0,
            temperature_c: 0.0,
            uptime_pct: 0.0,
            last_seen: now,
            total_earnings: 0.0,
            purchase_price: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change the operational state, stamping `last_seen`
    pub fn set_status(&mut self, status: DeviceStatus, now: DateTime<Utc>) {
        self.status = status;
        self.last_seen = now;
        self.updated_at = now;
    }

    /// Return on investment as a percentage; zero while the purchase
    /// price is unknown
    pub fn roi(&self) -> f64 {
        match self.purchase_price {
            Some(price) if price > 0.0 => (self.total_earnings / price) * 100.0,
            _ => 0.0,
        }
    }
}
