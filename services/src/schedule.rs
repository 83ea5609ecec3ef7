use chrono::{Datelike, NaiveDateTime};
use sea_orm::DatabaseConnection;
use strum::{Display, EnumString};
use util::config;

use crate::error::AppError;

pub use db::models::timetable_entry::Model as TimetableEntry;

/// What to do when more than one timetable entry covers the same room and minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OverlapPolicy {
    /// First entry in storage order.
    #[default]
    First,
    /// Refuse to pick; the caller gets `AmbiguousSchedule`.
    Reject,
    /// Shortest slot wins, ties broken by storage order.
    Narrowest,
}

impl OverlapPolicy {
    pub fn from_config() -> Self {
        let raw = config::schedule_overlap_policy();
        raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "Unknown SCHEDULE_OVERLAP_POLICY, using 'first'");
            OverlapPolicy::First
        })
    }

    fn pick(self, classroom: &str, mut hits: Vec<TimetableEntry>) -> Result<Option<TimetableEntry>, AppError> {
        if hits.len() <= 1 {
            return Ok(hits.pop());
        }
        match self {
            OverlapPolicy::First => Ok(hits.into_iter().next()),
            OverlapPolicy::Reject => Err(AppError::AmbiguousSchedule(classroom.to_owned())),
            OverlapPolicy::Narrowest => Ok(hits
                .into_iter()
                .enumerate()
                .min_by_key(|(i, e)| (e.span_minutes().unwrap_or(u32::MAX), *i))
                .map(|(_, e)| e)),
        }
    }
}

/// Looks up which subject is taught in a room at a given moment.
#[derive(Clone)]
pub struct ScheduleResolver {
    db: DatabaseConnection,
    policy: OverlapPolicy,
}

impl ScheduleResolver {
    pub fn new(db: DatabaseConnection, policy: OverlapPolicy) -> Self {
        Self { db, policy }
    }

    /// Returns the covering entry, or `None` when nothing is scheduled.
    ///
    /// Matching is on the weekday of `at` (0 = Sunday) and its `HH:MM`,
    /// inclusive on both ends of the slot. Read-only.
    pub async fn resolve(
        &self,
        classroom: &str,
        at: NaiveDateTime,
    ) -> Result<Option<TimetableEntry>, AppError> {
        let day_of_week = at.weekday().num_days_from_sunday() as i32;
        let time_of_day = at.format("%H:%M").to_string();

        let hits =
            TimetableEntry::find_covering(&self.db, classroom, day_of_week, &time_of_day).await?;
        if hits.len() > 1 {
            tracing::debug!(
                classroom,
                count = hits.len(),
                policy = %self.policy,
                "Overlapping timetable entries"
            );
        }
        self.policy.pick(classroom, hits)
    }
}
