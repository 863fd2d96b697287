//! KYC Status Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity-verification state of a user
///
/// State machine: `Pending -> Submitted -> {Approved, Rejected}`.
/// A new session may be started only from `Pending` or `Rejected`; starting
/// one while `Submitted` would overwrite an in-flight scan reference.
/// `Approved`/`Rejected` are reachable only via the identity webhook
/// reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KycStatus {
    /// No verification session started yet
    #[default]
    Pending,
    /// A session is in flight; scan reference recorded
    Submitted,
    /// Provider approved the submission
    Approved,
    /// Provider declined the submission; resubmission allowed
    Rejected,
}

impl KycStatus {
    /// Get string code for storage/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(Self::Pending),
            "SUBMITTED" => Some(Self::Submitted),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Whether verification has been approved
    #[inline]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Whether a new verification session may be started
    #[inline]
    pub const fn can_start_session(&self) -> bool {
        matches!(self, Self::Pending | Self::Rejected)
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
