//! Identity Provider Client
//!
//! Thin reqwest client for the provider's token endpoint. Credentials go
//! over HTTP basic auth; the response carries the session's scan
//! reference and redirect token.

use serde::Deserialize;

use crate::domain::repository::{IdentitySession, IdentitySessionProvider, SessionRequest};
use crate::error::{VerifyError, VerifyResult};

const DEFAULT_API_BASE: &str = "https://ivs.idenfy.com";

/// iDenfy-backed identity session provider
#[derive(Clone)]
pub struct IdenfyProvider {
    http: reqwest::Client,
    api_key: String,
    api_secret: String,
    api_base: String,
}

impl IdenfyProvider {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self::with_api_base(api_key, api_secret, DEFAULT_API_BASE.to_string())
    }

    /// Point the client at a different base URL (test doubles)
    pub fn with_api_base(api_key: String, api_secret: String, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            api_secret,
            api_base,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    auth_token: String,
    scan_ref: String,
}

impl IdentitySessionProvider for IdenfyProvider {
    async fn create_session(&self, request: &SessionRequest) -> VerifyResult<IdentitySession> {
        let body = serde_json::json!({
            "clientId": request.client_id,
            "firstName": request.first_name,
            "lastName": request.last_name,
        });

        let response = self
            .http
            .post(format!("{}/api/v2/token", self.api_base))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| VerifyError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Session creation rejected");
            return Err(VerifyError::Provider(format!(
                "session creation failed with status {status}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| VerifyError::Provider(e.to_string()))?;

        Ok(IdentitySession {
            scan_ref: token.scan_ref,
            auth_token: token.auth_token,
        })
    }
}
