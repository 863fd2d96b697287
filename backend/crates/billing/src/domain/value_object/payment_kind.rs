//! Payment Kind Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of money movement a ledger entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentKind {
    /// Customer purchase (hardware bundle or plan)
    #[default]
    Purchase,
    /// Mining earnings payout to the customer
    Payout,
    /// Service fee
    Fee,
    /// Refund of an earlier purchase
    Refund,
}

impl PaymentKind {
    /// Get string code for storage/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Purchase => "PURCHASE",
            Self::Payout => "PAYOUT",
            Self::Fee => "FEE",
            Self::Refund => "REFUND",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PURCHASE" => Some(Self::Purchase),
            "PAYOUT" => Some(Self::Payout),
            "FEE" => Some(Self::Fee),
            "REFUND" => Some(Self::Refund),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for kind in [
            PaymentKind::Purchase,
            PaymentKind::Payout,
            PaymentKind::Fee,
            PaymentKind::Refund,
        ] {
            assert_eq!(PaymentKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        assert_eq!(PaymentKind::from_code("purchase"), None);
        assert_eq!(PaymentKind::from_code("CHARGEBACK"), None);
    }
}
