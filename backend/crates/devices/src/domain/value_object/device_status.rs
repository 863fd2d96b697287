//! Device Status Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational state of an ASIC device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceStatus {
    Online,
    /// Registered but not hashing
    #[default]
    Offline,
    Maintenance,
    Error,
}

impl DeviceStatus {
    /// Get string code for storage/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
            Self::Maintenance => "MAINTENANCE",
            Self::Error => "ERROR",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ONLINE" => Some(Self::Online),
            "OFFLINE" => Some(Self::Offline),
            "MAINTENANCE" => Some(Self::Maintenance),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    /// Parse a client-supplied label (clients send lowercase)
    pub fn from_label(label: &str) -> Option<Self> {
        Self::from_code(&label.trim().to_ascii_uppercase())
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
