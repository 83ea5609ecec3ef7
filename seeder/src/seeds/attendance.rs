use crate::seed::Seeder;
use db::models::attendance_record::{Column, Entity};
use db::repository::Repository;
use sea_orm::{DatabaseConnection, DbErr};

/// Clears attendance left over from previous runs.
pub struct AttendanceResetSeeder;

#[async_trait::async_trait]
impl Seeder for AttendanceResetSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        Repository::<Entity, Column>::delete_all(db).await?;
        Ok(())
    }
}
