//! User Role Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user within the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserRole {
    /// Regular customer
    #[default]
    Client,
    /// Platform administrator
    Admin,
    /// Support staff
    Support,
}

impl UserRole {
    /// Get string code for storage/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Admin => "ADMIN",
            Self::Support => "SUPPORT",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "CLIENT" => Some(Self::Client),
            "ADMIN" => Some(Self::Admin),
            "SUPPORT" => Some(Self::Support),
            _ => None,
        }
    }

    /// Whether the role grants administrative access
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
