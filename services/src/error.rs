use sea_orm::DbErr;
use thiserror::Error;

/// Failures the attendance core can report to a caller.
///
/// The `Display` text is what participants and presenters see, so it is
/// phrased for them rather than for logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not identify device. Ensure you are on the local network.")]
    Identity,

    #[error("ACCESS DENIED: Device mismatch! Registered device only.")]
    AccessDenied,

    #[error("No active lecture session!")]
    NoActiveSession,

    #[error("Another presenter is running the active session.")]
    SessionConflict,

    #[error("Expired or Invalid QR Code.")]
    InvalidCode,

    #[error("No scheduled lecture for {0} at this time.")]
    NoSchedule(String),

    #[error("More than one lecture is scheduled for {0} at this time.")]
    AmbiguousSchedule(String),

    #[error("Unknown student {0}.")]
    UnknownStudent(String),

    #[error("Database error: {0}")]
    Storage(#[from] DbErr),
}
