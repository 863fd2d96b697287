//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::get_profile::ProfileOutput;

/// Response for GET /api/accounts/me
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: String,
    pub plan: String,
    pub has_paid: bool,
    pub status: String,
    pub kyc_status: String,
}

impl From<ProfileOutput> for ProfileResponse {
    fn from(output: ProfileOutput) -> Self {
        Self {
            first_name: output.first_name,
            last_name: output.last_name,
            email: output.email,
            role: output.role,
            plan: output.plan,
            has_paid: output.has_paid,
            status: output.account_status,
            kyc_status: output.kyc_status,
        }
    }
}

/// Request for POST /api/accounts/admin/status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideStatusRequest {
    pub user_id: Uuid,
    pub status: String,
}

/// Response for POST /api/accounts/admin/status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideStatusResponse {
    pub user_id: Uuid,
    pub status: String,
}
