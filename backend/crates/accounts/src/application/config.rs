//! Application Configuration

/// Accounts application configuration
#[derive(Debug, Clone, Default)]
pub struct AccountsConfig {
    /// Shared secret for administrative endpoints; `None` locks them out
    pub admin_token: Option<String>,
}

impl AccountsConfig {
    /// Create config with a random admin token (for development)
    pub fn development() -> Self {
        Self {
            admin_token: Some(platform::crypto::to_hex(&platform::crypto::random_bytes(16))),
        }
    }
}
