//! Account Status Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a user account
///
/// `Active` is reachable only through the activation policy
/// (`domain::activation`), never by direct assignment from the API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountStatus {
    /// Provisioned but not yet activated
    #[default]
    Pending,
    /// Fully usable account (KYC approved and payment completed)
    Active,
    /// Administratively suspended
    Suspended,
    /// Closed account (soft state, row is never deleted)
    Closed,
}

impl AccountStatus {
    /// Get string code for storage/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Closed => "CLOSED",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(Self::Pending),
            "ACTIVE" => Some(Self::Active),
            "SUSPENDED" => Some(Self::Suspended),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Whether the account is active
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
