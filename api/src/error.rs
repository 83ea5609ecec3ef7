//! Maps core failures onto HTTP statuses and client-facing messages.

use axum::{Json, http::StatusCode};
use serde::Serialize;
use services::AppError;

use crate::response::ApiResponse;

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Identity | AppError::NoActiveSession | AppError::InvalidCode => {
            StatusCode::BAD_REQUEST
        }
        AppError::AccessDenied => StatusCode::FORBIDDEN,
        AppError::SessionConflict | AppError::AmbiguousSchedule(_) => StatusCode::CONFLICT,
        AppError::NoSchedule(_) | AppError::UnknownStudent(_) => StatusCode::NOT_FOUND,
        AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Text safe to show the caller. Storage failures are logged here and
/// replaced by a generic message.
pub fn client_message(err: &AppError) -> String {
    match err {
        AppError::Storage(e) => {
            tracing::error!("Storage failure: {e}");
            "Internal server error".to_string()
        }
        other => other.to_string(),
    }
}

pub fn error_response<T>(err: AppError) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    (status_for(&err), Json(ApiResponse::error(client_message(&err))))
}
