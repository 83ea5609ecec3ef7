use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::StatusCode,
};
use services::AppError;
use services::attendance::RecordOutcome;
use services::device_binding::BindingOutcome;
use std::net::SocketAddr;

use super::common::{LoginRequest, LoginResponse, ScanRequest, ScanResponse};
use crate::error::error_response;
use crate::response::ApiResponse;
use crate::state::AppState;

async fn fingerprint_of(state: &AppState, addr: SocketAddr) -> Result<String, AppError> {
    state
        .fingerprints()
        .resolve(addr.ip())
        .await
        .ok_or(AppError::Identity)
}

fn missing_roll_number<T: serde::Serialize + Default>() -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error("Roll number is required.")),
    )
}

/// POST /api/login
///
/// Identifies the caller's device from its network address and binds it to
/// the roll number on first use.
///
/// ### Request Body
/// ```json
/// { "rollNumber": "101" }
/// ```
///
/// ### Responses
/// - `200 OK` first login (`firstBind: true`) or the registered device
/// - `400 Bad Request` device could not be identified
/// - `403 Forbidden` roll number is bound to another device
/// - `500 Internal Server Error`
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<LoginResponse>>) {
    let roll_number = body.roll_number.trim();
    if roll_number.is_empty() {
        return missing_roll_number();
    }

    let fingerprint = match fingerprint_of(&state, addr).await {
        Ok(fp) => fp,
        Err(e) => {
            tracing::info!(roll_number, ip = %addr.ip(), "Login from unidentifiable device");
            return error_response(e);
        }
    };

    match state.binding().verify(roll_number, &fingerprint).await {
        Ok(BindingOutcome::FirstBindDone) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                LoginResponse {
                    roll_number: roll_number.to_owned(),
                    first_bind: true,
                },
                "First Login: Device Bound Successfully.",
            )),
        ),
        Ok(BindingOutcome::Bound) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                LoginResponse {
                    roll_number: roll_number.to_owned(),
                    first_bind: false,
                },
                "Login successful. Proceed to scan.",
            )),
        ),
        Ok(BindingOutcome::Mismatch) => error_response(AppError::AccessDenied),
        Err(e) => error_response(e),
    }
}

/// POST /api/scan
///
/// Marks the caller present for the running session. The device check runs
/// first, so a shared roll number cannot be scanned from a second device.
///
/// ### Request Body
/// ```json
/// { "rollNumber": "101", "qrCode": "ZP-4821" }
/// ```
///
/// ### Responses
/// - `200 OK` marked now or already present
/// - `400 Bad Request` unidentifiable device, no active session, or stale code
/// - `403 Forbidden` roll number is bound to another device
/// - `500 Internal Server Error`
pub async fn scan(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<ScanRequest>,
) -> (StatusCode, Json<ApiResponse<ScanResponse>>) {
    let roll_number = body.roll_number.trim();
    if roll_number.is_empty() {
        return missing_roll_number();
    }

    let fingerprint = match fingerprint_of(&state, addr).await {
        Ok(fp) => fp,
        Err(e) => return error_response(e),
    };
    if let Err(e) = state.binding().require(roll_number, &fingerprint).await {
        return error_response(e);
    }

    match state.sessions().scan(roll_number, body.qr_code.trim()).await {
        Ok(marked) => {
            let message = format!("Attendance marked for {}", marked.subject);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ScanResponse {
                        already_present: marked.outcome == RecordOutcome::AlreadyPresent,
                        subject: marked.subject,
                    },
                    message,
                )),
            )
        }
        Err(e) => error_response(e),
    }
}
