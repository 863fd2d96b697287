//! Application Configuration

/// Verify application configuration
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Optional webhook signature secret
    ///
    /// The provider's webhook carries no signature by default; `None`
    /// preserves that unauthenticated acceptance. When set, deliveries
    /// must carry a valid HMAC hex signature header.
    pub webhook_secret: Option<String>,
    /// Provider API credentials
    pub api_key: String,
    pub api_secret: String,
    /// Base URL the applicant is redirected to with the session token
    pub redirect_base: String,
}

impl VerifyConfig {
    pub fn new(api_key: String, api_secret: String, webhook_secret: Option<String>) -> Self {
        Self {
            webhook_secret,
            api_key,
            api_secret,
            redirect_base: "https://ivs.idenfy.com/api/v2/redirect".to_string(),
        }
    }

    /// Create config with random credentials (for development)
    pub fn development() -> Self {
        Self::new(
            platform::crypto::to_hex(&platform::crypto::random_bytes(8)),
            platform::crypto::to_hex(&platform::crypto::random_bytes(16)),
            None,
        )
    }
}
