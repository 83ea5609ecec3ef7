use crate::seed::Seeder;
use chrono::Utc;
use db::models::student::{ActiveModel, Column, Entity};
use db::repository::Repository;
use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr};

pub const CLASSROOM: &str = "SY-CS-A";

const NAMES: [&str; 20] = [
    "Rahul Verma",
    "Aman Shaikh",
    "Priya Raj",
    "Rohan Das",
    "Simran Kaur",
    "Arjun Singh",
    "Neha Gupta",
    "Karan Patel",
    "Pooja Sharma",
    "Vikram Malhotra",
    "Sneha Reddy",
    "Aditya Joshi",
    "Riya Mehta",
    "Sachin Tendulkar",
    "Ananya Pandey",
    "Rohit Sharma",
    "Virat Kohli",
    "MS Dhoni",
    "Hardik Pandya",
    "Jasprit Bumrah",
];

/// Replaces every student with an unbound demo roster of roll numbers 101 to 120.
pub struct StudentSeeder;

#[async_trait::async_trait]
impl Seeder for StudentSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        Repository::<Entity, Column>::delete_all(db).await?;

        let now = Utc::now();
        let students = NAMES
            .iter()
            .zip(101..)
            .map(|(name, roll)| ActiveModel {
                roll_number: Set(roll.to_string()),
                name: Set((*name).to_string()),
                classroom: Set(Some(CLASSROOM.to_string())),
                device_fingerprint: Set(None),
                created_at: Set(now),
            })
            .collect();
        Repository::<Entity, Column>::create_many(db, students).await?;
        Ok(())
    }
}
