//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type UserId = Id<markers::User>;
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
            _marker: PhantomData,
        }
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    /// Convert to UUID
    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_uuid(Uuid::parse_str(s)?))
    }
}

/// Marker types for entity IDs
pub mod markers {
    /// User aggregate
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct User;
    /// Payment ledger entry
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Payment;
    /// Inbound provider event log entry
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ProviderEvent;
    /// ASIC mining device record
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Device;
}

/// User ID
pub type UserId = Id<markers::User>;
/// Payment ledger entry ID
pub type PaymentId = Id<markers::Payment>;
/// Provider event log entry ID (for providers without their own event ids)
pub type ProviderEventId = Id<markers::ProviderEvent>;
/// ASIC device record ID
pub type DeviceId = Id<markers::Device>;
