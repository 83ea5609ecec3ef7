use axum::{Json, extract::State, http::StatusCode};

use super::common::SessionStatusResponse;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/session
///
/// Tells attendee devices whether a lecture is running, and which one.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "active": true,
///     "subject": "Java Programming",
///     "classroom": "SY-CS-A",
///     "lecturerName": "Prof. Smith"
///   },
///   "message": "Session in progress"
/// }
/// ```
pub async fn session_status(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<SessionStatusResponse>>) {
    let (data, message) = match state.sessions().snapshot().await {
        Some(s) => (
            SessionStatusResponse {
                active: true,
                subject: Some(s.subject),
                classroom: Some(s.classroom),
                lecturer_name: Some(s.lecturer_name),
            },
            "Session in progress",
        ),
        None => (SessionStatusResponse::default(), "No active lecture session"),
    };
    (StatusCode::OK, Json(ApiResponse::success(data, message)))
}
