//! Plan Tier Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Purchased plan tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanTier {
    /// Default tier before any purchase
    #[default]
    Basic,
    Standard,
    Premium,
}

impl PlanTier {
    /// Get string code for storage/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Standard => "STANDARD",
            Self::Premium => "PREMIUM",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BASIC" => Some(Self::Basic),
            "STANDARD" => Some(Self::Standard),
            "PREMIUM" => Some(Self::Premium),
            _ => None,
        }
    }

    /// Map a purchase bundle label to a tier
    ///
    /// Provider metadata carries free-form bundle labels; anything
    /// unrecognized falls back to `Standard`, matching the purchase flow.
    pub fn from_bundle_label(label: &str) -> Self {
        Self::from_code(&label.to_uppercase()).unwrap_or(Self::Standard)
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
