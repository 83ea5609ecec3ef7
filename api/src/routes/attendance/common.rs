use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub roll_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub roll_number: String,
    pub qr_code: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub roll_number: String,
    /// `true` when this login created the device binding.
    pub first_bind: bool,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub subject: String,
    pub already_present: bool,
}

/// Public view of the running lecture. The current code is never included.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub active: bool,
    pub subject: Option<String>,
    pub classroom: Option<String>,
    pub lecturer_name: Option<String>,
}
