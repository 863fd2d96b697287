//! Payment Status Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a payment ledger entry
///
/// Transitions move forward only; re-applying the same terminal status is
/// a no-op so webhook redelivery converges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Created, awaiting provider confirmation
    #[default]
    Pending,
    /// Acknowledged by the provider, not yet settled
    Processed,
    /// Settled successfully
    Completed,
    /// Terminally failed
    Failed,
    /// Canceled before settlement
    Canceled,
}

impl PaymentStatus {
    /// Get string code for storage/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processed => "PROCESSED",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(Self::Pending),
            "PROCESSED" => Some(Self::Processed),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            "CANCELED" => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Whether the entry has settled successfully
    #[inline]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
