//! Live attendance session: `Idle → Active → Idle`.
//!
//! One session is active at a time. It is owned by the presenter connection
//! that started it; scans and manual marks are checked against its single
//! current code, and every state change is published on [`LIVE_TOPIC`].

pub mod events;

pub use events::*;

use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use util::ws::{WebSocketManager, emit_event};

use crate::attendance::{AttendanceRecorder, MarkMethod, RecordOutcome};
use crate::code_rotator::{CodeRotator, RotationHandle};
use crate::device_binding::Student;
use crate::error::AppError;
use crate::schedule::{OverlapPolicy, ScheduleResolver};

struct ActiveSession {
    generation: u64,
    owner: u64,
    classroom: String,
    subject: String,
    lecturer_name: String,
    code: String,
    issued_at: DateTime<Utc>,
    rotation: RotationHandle,
}

#[derive(Default)]
struct SessionState {
    active: Option<ActiveSession>,
}

/// Read-only view of the active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub owner: u64,
    pub classroom: String,
    pub subject: String,
    pub lecturer_name: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marked {
    pub subject: String,
    pub outcome: RecordOutcome,
}

pub struct SessionManager {
    db: DatabaseConnection,
    ws: WebSocketManager,
    schedule: ScheduleResolver,
    recorder: AttendanceRecorder,
    rotator: CodeRotator,
    state: Arc<RwLock<SessionState>>,
    generation: AtomicU64,
}

impl SessionManager {
    pub fn new(
        db: DatabaseConnection,
        ws: WebSocketManager,
        schedule: ScheduleResolver,
        recorder: AttendanceRecorder,
        rotator: CodeRotator,
    ) -> Self {
        Self {
            db,
            ws,
            schedule,
            recorder,
            rotator,
            state: Arc::new(RwLock::new(SessionState::default())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config(db: DatabaseConnection, ws: WebSocketManager) -> Self {
        Self::new(
            db.clone(),
            ws,
            ScheduleResolver::new(db.clone(), OverlapPolicy::from_config()),
            AttendanceRecorder::new(db),
            CodeRotator::from_config(),
        )
    }

    /// Resolves the subject for `classroom` at `at`, loads the roster and
    /// starts rotating codes. Publishes `sessionStarted` followed by the
    /// first `newQRCode`.
    ///
    /// The owner of a running session may call this again to restart it;
    /// anyone else gets `SessionConflict`. On failure the current state is
    /// left untouched.
    pub async fn start_session(
        &self,
        owner: u64,
        classroom: &str,
        at: NaiveDateTime,
    ) -> Result<SessionStarted, AppError> {
        self.ensure_owner(owner).await?;

        let entry = self
            .schedule
            .resolve(classroom, at)
            .await?
            .ok_or_else(|| AppError::NoSchedule(classroom.to_owned()))?;
        let roster = self.roster(classroom, &entry.subject).await?;

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut state = self.state.write().await;
        if let Some(active) = &state.active {
            if active.owner != owner {
                return Err(AppError::SessionConflict);
            }
        }
        if let Some(previous) = state.active.take() {
            previous.rotation.cancel();
            tracing::info!(subject = %previous.subject, "Presenter restarted the session");
        }

        let rotation_seconds = self.rotator.period().as_secs();
        let shared = Arc::clone(&self.state);
        let ws = self.ws.clone();
        let (code, rotation) = self.rotator.start(move |code| {
            let state = Arc::clone(&shared);
            let ws = ws.clone();
            async move {
                // Checked under the write lock, so a torn-down or replaced
                // session can never publish another code.
                let mut state = state.write().await;
                match state.active.as_mut() {
                    Some(active) if active.generation == generation => {
                        active.code = code.clone();
                        active.issued_at = Utc::now();
                        emit_event(&ws, &NewQrCode { code, rotation_seconds }).await;
                        true
                    }
                    _ => false,
                }
            }
        });

        state.active = Some(ActiveSession {
            generation,
            owner,
            classroom: classroom.to_owned(),
            subject: entry.subject.clone(),
            lecturer_name: entry.lecturer_name.clone(),
            code: code.clone(),
            issued_at: Utc::now(),
            rotation,
        });

        let started = SessionStarted {
            subject: entry.subject,
            classroom: classroom.to_owned(),
            lecturer_name: entry.lecturer_name,
            roster,
        };
        emit_event(&self.ws, &started).await;
        emit_event(&self.ws, &NewQrCode { code, rotation_seconds }).await;

        tracing::info!(
            owner,
            classroom,
            subject = %started.subject,
            students = started.roster.len(),
            "Session started"
        );
        Ok(started)
    }

    /// Accepts the scan iff `code` equals the most recently issued code.
    pub async fn scan(&self, roll_number: &str, code: &str) -> Result<Marked, AppError> {
        let (subject, generation) = {
            let state = self.state.read().await;
            let active = state.active.as_ref().ok_or(AppError::NoActiveSession)?;
            if active.code != code {
                tracing::debug!(roll_number, presented = code, "Stale or invalid code");
                return Err(AppError::InvalidCode);
            }
            (active.subject.clone(), active.generation)
        };
        self.mark(roll_number, subject, generation, MarkMethod::Scan).await
    }

    /// Presenter bypass of the code check. Only the session owner may use it.
    pub async fn mark_manual(&self, owner: u64, roll_number: &str) -> Result<Marked, AppError> {
        let (subject, generation) = {
            let state = self.state.read().await;
            let active = owned(&state, owner)?;
            (active.subject.clone(), active.generation)
        };
        self.mark(roll_number, subject, generation, MarkMethod::Manual).await
    }

    /// Tears the session down if `owner` runs it. Safe to call repeatedly;
    /// returns whether anything was torn down.
    pub async fn close(&self, owner: u64) -> bool {
        self.teardown(|active| active.owner == owner).await
    }

    /// Tears down whatever session is active, regardless of owner.
    pub async fn end_session(&self) -> bool {
        self.teardown(|_| true).await
    }

    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        self.state.read().await.active.as_ref().map(|a| SessionSnapshot {
            owner: a.owner,
            classroom: a.classroom.clone(),
            subject: a.subject.clone(),
            lecturer_name: a.lecturer_name.clone(),
            code: a.code.clone(),
            issued_at: a.issued_at,
        })
    }

    /// Fails unless `owner` runs the active session.
    pub async fn require_owner(&self, owner: u64) -> Result<(), AppError> {
        let state = self.state.read().await;
        owned(&state, owner)?;
        Ok(())
    }

    async fn ensure_owner(&self, owner: u64) -> Result<(), AppError> {
        match &self.state.read().await.active {
            Some(active) if active.owner != owner => Err(AppError::SessionConflict),
            _ => Ok(()),
        }
    }

    async fn roster(&self, classroom: &str, subject: &str) -> Result<Vec<RosterEntry>, AppError> {
        let students = Student::find_by_classroom(&self.db, classroom).await?;
        let present = self.recorder.present_in(subject).await?;
        Ok(students
            .into_iter()
            .map(|s| RosterEntry {
                is_present: present.contains(&s.roll_number),
                roll_number: s.roll_number,
                name: s.name,
            })
            .collect())
    }

    async fn mark(
        &self,
        roll_number: &str,
        subject: String,
        generation: u64,
        method: MarkMethod,
    ) -> Result<Marked, AppError> {
        let outcome = self.recorder.record(roll_number, &subject, method).await?;
        if outcome == RecordOutcome::Created {
            let state = self.state.read().await;
            if state.active.as_ref().is_some_and(|a| a.generation == generation) {
                let ev = StudentMarked {
                    roll_number: roll_number.to_owned(),
                    subject: subject.clone(),
                    method,
                };
                emit_event(&self.ws, &ev).await;
            }
        }
        Ok(Marked { subject, outcome })
    }

    async fn teardown(&self, should_close: impl FnOnce(&ActiveSession) -> bool) -> bool {
        let mut state = self.state.write().await;
        if !state.active.as_ref().is_some_and(should_close) {
            return false;
        }
        let Some(active) = state.active.take() else {
            return false;
        };
        active.rotation.cancel();

        let ev = SessionClosed {
            subject: active.subject.clone(),
            classroom: active.classroom.clone(),
        };
        emit_event(&self.ws, &ev).await;
        tracing::info!(owner = active.owner, subject = %active.subject, "Session closed");
        true
    }
}

fn owned(state: &SessionState, owner: u64) -> Result<&ActiveSession, AppError> {
    match &state.active {
        None => Err(AppError::NoActiveSession),
        Some(active) if active.owner != owner => Err(AppError::SessionConflict),
        Some(active) => Ok(active),
    }
}
