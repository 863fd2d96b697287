//! Verification Record Entity
//!
//! The current identity-verification submission embedded in [`super::user::User`].
//! Superseded records are archived, never deleted.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// One identity-verification submission
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRecord {
    /// Document type as declared by the applicant (e.g. "PASSPORT")
    pub document_type: String,
    /// Document number as declared by the applicant
    pub document_number: String,
    /// Provider's opaque handle for this verification session
    pub scan_ref: String,
    /// When the session was started
    pub submitted_at: DateTime<Utc>,
    /// When the provider approved it, if it did
    pub approved_at: Option<DateTime<Utc>>,
    /// Provider response blob, merged across webhook deliveries
    pub metadata: Value,
}

impl VerificationRecord {
    /// Create a record for a freshly started session
    pub fn new(
        document_type: String,
        document_number: String,
        scan_ref: String,
        metadata: Value,
    ) -> Self {
        Self {
            document_type,
            document_number,
            scan_ref,
            submitted_at: Utc::now(),
            approved_at: None,
            metadata,
        }
    }

    /// Merge provider info into the metadata blob
    ///
    /// Object keys from `info` overwrite existing keys; a non-object `info`
    /// replaces the blob wholesale.
    pub fn merge_metadata(&mut self, info: Value) {
        match (&mut self.metadata, info) {
            (Value::Object(existing), Value::Object(incoming)) => {
                for (key, value) in incoming {
                    existing.insert(key, value);
                }
            }
            (slot, incoming) => *slot = incoming,
        }
    }
}
