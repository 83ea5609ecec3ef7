use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use util::filters::FilterParam;

use crate::repository::Repository;

/// One weekly timetable slot: `subject` is taught in `classroom` on
/// `day_of_week` between `start_time` and `end_time`, both inclusive.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "timetable_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub classroom: String,
    /// 0 = Sunday ... 6 = Saturday.
    pub day_of_week: i32,
    /// Zero-padded `HH:MM`.
    pub start_time: String,
    /// Zero-padded `HH:MM`.
    pub end_time: String,
    pub subject: String,
    pub lecturer_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

type Timetable = Repository<Entity, Column>;

/// Parses a zero-padded `HH:MM` into minutes since midnight.
pub fn parse_hhmm(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        classroom: &str,
        day_of_week: i32,
        start_time: &str,
        end_time: &str,
        subject: &str,
        lecturer_name: &str,
    ) -> Result<Self, DbErr> {
        if !(0..=6).contains(&day_of_week) {
            return Err(DbErr::Custom(format!(
                "day_of_week must be 0..=6, got {day_of_week}"
            )));
        }
        for t in [start_time, end_time] {
            if parse_hhmm(t).is_none() {
                return Err(DbErr::Custom(format!("'{t}' is not a zero-padded HH:MM time")));
            }
        }

        let active = ActiveModel {
            id: NotSet,
            classroom: Set(classroom.to_owned()),
            day_of_week: Set(day_of_week),
            start_time: Set(start_time.to_owned()),
            end_time: Set(end_time.to_owned()),
            subject: Set(subject.to_owned()),
            lecturer_name: Set(lecturer_name.to_owned()),
        };
        Timetable::create(db, active).await
    }

    /// Every entry for `classroom` on `day_of_week` whose inclusive range
    /// contains `time_of_day`, in storage order.
    pub async fn find_covering<C: ConnectionTrait>(
        db: &C,
        classroom: &str,
        day_of_week: i32,
        time_of_day: &str,
    ) -> Result<Vec<Self>, DbErr> {
        Timetable::find_all(
            db,
            &[
                FilterParam::eq("classroom", classroom),
                FilterParam::eq("day_of_week", day_of_week),
                FilterParam::lte("start_time", time_of_day),
                FilterParam::gte("end_time", time_of_day),
            ],
            Some("id"),
        )
        .await
    }

    /// Length of the slot in minutes; `None` if a stored time is malformed.
    pub fn span_minutes(&self) -> Option<u32> {
        let start = parse_hhmm(&self.start_time)?;
        let end = parse_hhmm(&self.end_time)?;
        end.checked_sub(start)
    }
}
