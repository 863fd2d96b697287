//! Application Configuration

/// Default replay window for webhook signature timestamps
pub const DEFAULT_SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Billing application configuration
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Shared secret the provider signs webhook bodies with
    pub webhook_secret: String,
    /// Allowed clock skew for the signature timestamp
    pub signature_tolerance_secs: i64,
    /// Shared secret for administrative endpoints; `None` locks them out
    pub admin_token: Option<String>,
}

impl BillingConfig {
    pub fn new(webhook_secret: String, admin_token: Option<String>) -> Self {
        Self {
            webhook_secret,
            signature_tolerance_secs: DEFAULT_SIGNATURE_TOLERANCE_SECS,
            admin_token,
        }
    }

    /// Create config with random secrets (for development)
    pub fn development() -> Self {
        Self {
            webhook_secret: platform::crypto::to_hex(&platform::crypto::random_bytes(32)),
            signature_tolerance_secs: DEFAULT_SIGNATURE_TOLERANCE_SECS,
            admin_token: Some(platform::crypto::to_hex(&platform::crypto::random_bytes(16))),
        }
    }
}
