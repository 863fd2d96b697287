//! Identity Event Log
//!
//! The identity provider delivers `{scanRef, status, info}` with no event
//! id of its own, so log rows are keyed locally and every delivery is
//! logged for audit regardless of trust.

use accounts::KycStatus;
use chrono::{DateTime, Utc};
use kernel::id::ProviderEventId;
use serde_json::Value;

/// One inbound identity webhook delivery
///
/// Append-only: after the insert only `processed` and `error` are ever
/// written.
#[derive(Debug, Clone)]
pub struct IdentityEventLog {
    pub log_id: ProviderEventId,
    pub scan_ref: String,
    /// Provider status string as delivered
    pub status: String,
    pub info: Value,
    pub processed: bool,
    pub error: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl IdentityEventLog {
    pub fn new(scan_ref: String, status: String, info: Value) -> Self {
        Self {
            log_id: ProviderEventId::new(),
            scan_ref,
            status,
            info,
            processed: false,
            error: None,
            received_at: Utc::now(),
        }
    }
}

/// Map a provider status string to the internal KYC status
///
/// Anything unrecognized is treated as still in review.
pub fn map_provider_status(status: &str) -> KycStatus {
    match status {
        "APPROVED" => KycStatus::Approved,
        "DECLINED" => KycStatus::Rejected,
        _ => KycStatus::Submitted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_provider_status() {
        assert_eq!(map_provider_status("APPROVED"), KycStatus::Approved);
        assert_eq!(map_provider_status("DECLINED"), KycStatus::Rejected);
        assert_eq!(map_provider_status("EXPIRED"), KycStatus::Submitted);
        assert_eq!(map_provider_status("REVIEWING"), KycStatus::Submitted);
        // Case-sensitive, like the provider's own constants
        assert_eq!(map_provider_status("approved"), KycStatus::Submitted);
    }

    #[test]
    fn test_new_log_entry_is_unprocessed() {
        let entry = IdentityEventLog::new("scan-1".into(), "APPROVED".into(), json!({}));
        assert!(!entry.processed);
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_log_ids_are_unique() {
        let a = IdentityEventLog::new("s".into(), "APPROVED".into(), json!({}));
        let b = IdentityEventLog::new("s".into(), "APPROVED".into(), json!({}));
        assert_ne!(a.log_id, b.log_id);
    }
}
