//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::{KycStatusOutput, StartSessionOutput, TrackOutcome};

/// Response for POST /api/verify/webhooks/idenfy
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub message: String,
}

/// Request for POST /api/verify/kyc/start
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub document_type: String,
    #[serde(default)]
    pub document_number: String,
}

/// Response for POST /api/verify/kyc/start
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub scan_ref: String,
    pub auth_token: String,
    pub redirect_url: String,
}

impl From<StartSessionOutput> for StartSessionResponse {
    fn from(output: StartSessionOutput) -> Self {
        Self {
            scan_ref: output.scan_ref,
            auth_token: output.auth_token,
            redirect_url: output.redirect_url,
        }
    }
}

/// Request for POST /api/verify/kyc/track
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    #[serde(default)]
    pub scan_ref: String,
}

/// Response for POST /api/verify/kyc/track
#[derive(Debug, Clone, Serialize)]
pub struct TrackResponse {
    pub message: String,
}

impl From<TrackOutcome> for TrackResponse {
    fn from(outcome: TrackOutcome) -> Self {
        let message = match outcome {
            TrackOutcome::Tracked => "Verification completion tracked",
            TrackOutcome::AlreadyTracked => "Verification completion already tracked",
        };
        Self {
            message: message.to_string(),
        }
    }
}

/// Response for GET /api/verify/kyc/status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycStatusResponse {
    pub kyc_status: String,
    pub email: Option<String>,
    pub scan_ref: Option<String>,
}

impl From<KycStatusOutput> for KycStatusResponse {
    fn from(output: KycStatusOutput) -> Self {
        Self {
            kyc_status: output.kyc_status,
            email: output.email,
            scan_ref: output.scan_ref,
        }
    }
}
