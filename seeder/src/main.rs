use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    attendance::AttendanceResetSeeder, student::StudentSeeder, timetable::TimetableSeeder,
};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::process::ExitCode;

mod seed;
mod seeds;

#[tokio::main]
async fn main() -> ExitCode {
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("Failed to run migrations: {e}");
        return ExitCode::FAILURE;
    }

    for (seeder, name) in [
        (Box::new(StudentSeeder) as Box<dyn Seeder + Send + Sync>, "Student"),
        (Box::new(TimetableSeeder), "Timetable"),
        (Box::new(AttendanceResetSeeder), "Attendance"),
    ] {
        if let Err(e) = run_seeder(&*seeder, name, &db).await {
            eprintln!("{name} seeder failed: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
