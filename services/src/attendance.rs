use sea_orm::DatabaseConnection;
use std::collections::HashSet;

use crate::error::AppError;

pub use db::models::attendance_record::{MarkMethod, Model as AttendanceRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Created,
    AlreadyPresent,
}

#[derive(Clone)]
pub struct AttendanceRecorder {
    db: DatabaseConnection,
}

impl AttendanceRecorder {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Idempotent per (student, subject). The existence check and the insert
    /// are one statement, so concurrent duplicates cannot both create.
    pub async fn record(
        &self,
        roll_number: &str,
        subject: &str,
        method: MarkMethod,
    ) -> Result<RecordOutcome, AppError> {
        let created =
            AttendanceRecord::insert_if_absent(&self.db, roll_number, subject, method).await?;
        if created {
            tracing::info!(roll_number, subject, %method, "Attendance recorded");
            Ok(RecordOutcome::Created)
        } else {
            tracing::debug!(roll_number, subject, "Already present");
            Ok(RecordOutcome::AlreadyPresent)
        }
    }

    pub async fn present_in(&self, subject: &str) -> Result<HashSet<String>, AppError> {
        Ok(AttendanceRecord::present_roll_numbers(&self.db, subject)
            .await?
            .into_iter()
            .collect())
    }
}
