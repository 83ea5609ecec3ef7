use crate::seed::Seeder;
use crate::seeds::student::CLASSROOM;
use chrono::{Datelike, Local, Timelike};
use db::models::timetable_entry::{Column, Entity, Model};
use db::repository::Repository;
use sea_orm::{DatabaseConnection, DbErr};

/// One "Java Programming" slot from the top of the current hour to the end
/// of the next, so a session can be started right after seeding.
pub struct TimetableSeeder;

/// `(start, end)` for a slot covering `hour` and the hour after it.
pub fn demo_slot(hour: u32) -> (String, String) {
    let end_hour = (hour + 1).min(23);
    (format!("{hour:02}:00"), format!("{end_hour:02}:59"))
}

#[async_trait::async_trait]
impl Seeder for TimetableSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        Repository::<Entity, Column>::delete_all(db).await?;

        let now = Local::now();
        let (start, end) = demo_slot(now.hour());
        let day = now.weekday().num_days_from_sunday() as i32;
        Model::create(db, CLASSROOM, day, &start, &end, "Java Programming", "Prof. Smith").await?;
        Ok(())
    }
}
