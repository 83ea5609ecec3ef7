use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use util::filters::FilterParam;

use crate::repository::Repository;

/// A student enrolled in (or lazily created for) a classroom.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Roll number, unique per institution.
    #[sea_orm(primary_key, auto_increment = false)]
    pub roll_number: String,
    pub name: String,
    /// Roster key. `None` for students created on first login.
    pub classroom: Option<String>,
    /// Device the student is bound to; written once by the first login.
    pub device_fingerprint: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

type Students = Repository<Entity, Column>;

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        roll_number: &str,
        name: &str,
        classroom: Option<&str>,
        device_fingerprint: Option<&str>,
    ) -> Result<Self, DbErr> {
        let active = ActiveModel {
            roll_number: Set(roll_number.to_owned()),
            name: Set(name.to_owned()),
            classroom: Set(classroom.map(str::to_owned)),
            device_fingerprint: Set(device_fingerprint.map(str::to_owned)),
            created_at: Set(Utc::now()),
        };
        Students::create(db, active).await
    }

    /// Inserts a student already bound to `device_fingerprint` unless the
    /// roll number exists. Returns `true` when this call created the row.
    pub async fn create_bound_if_absent<C: ConnectionTrait>(
        db: &C,
        roll_number: &str,
        device_fingerprint: &str,
    ) -> Result<bool, DbErr> {
        let active = ActiveModel {
            roll_number: Set(roll_number.to_owned()),
            name: Set(format!("Student {roll_number}")),
            classroom: Set(None),
            device_fingerprint: Set(Some(device_fingerprint.to_owned())),
            created_at: Set(Utc::now()),
        };
        let inserted = Entity::insert(active)
            .on_conflict(OnConflict::column(Column::RollNumber).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
        Ok(inserted == 1)
    }

    pub async fn find_by_roll_number<C: ConnectionTrait>(
        db: &C,
        roll_number: &str,
    ) -> Result<Option<Self>, DbErr> {
        Students::find_one(db, &[FilterParam::eq("roll_number", roll_number)], None).await
    }

    /// Roster order is by roll number.
    pub async fn find_by_classroom<C: ConnectionTrait>(
        db: &C,
        classroom: &str,
    ) -> Result<Vec<Self>, DbErr> {
        Students::find_all(
            db,
            &[FilterParam::eq("classroom", classroom)],
            Some("roll_number"),
        )
        .await
    }

    /// Sets the fingerprint only while it is still empty, in one statement.
    /// Returns `true` if this call performed the binding.
    pub async fn bind_fingerprint_if_unbound<C: ConnectionTrait>(
        db: &C,
        roll_number: &str,
        device_fingerprint: &str,
    ) -> Result<bool, DbErr> {
        let patch = ActiveModel {
            device_fingerprint: Set(Some(device_fingerprint.to_owned())),
            ..Default::default()
        };
        let rows = Students::update(
            db,
            &[
                FilterParam::eq("roll_number", roll_number),
                FilterParam::eq("device_fingerprint", None::<String>),
            ],
            patch,
        )
        .await?;
        Ok(rows == 1)
    }

    /// Administrative reset. Returns `false` when the roll number is unknown.
    pub async fn clear_fingerprint<C: ConnectionTrait>(
        db: &C,
        roll_number: &str,
    ) -> Result<bool, DbErr> {
        let patch = ActiveModel {
            device_fingerprint: Set(None),
            ..Default::default()
        };
        let rows =
            Students::update(db, &[FilterParam::eq("roll_number", roll_number)], patch).await?;
        Ok(rows == 1)
    }
}
