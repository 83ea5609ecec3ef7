use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use util::filters::FilterParam;

use crate::repository::Repository;

/// At most one row per (student, subject); the composite key enforces it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub roll_number: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject: String,

    pub taken_at: DateTime<Utc>,
    pub method: MarkMethod,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "mark_method")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MarkMethod {
    /// Student scanned the live code on their bound device.
    #[sea_orm(string_value = "scan")]
    Scan,

    /// Presenter marked the student by hand.
    #[sea_orm(string_value = "manual")]
    Manual,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

type Records = Repository<Entity, Column>;

impl Model {
    /// Writes the record unless one already exists for the pair. Returns
    /// `true` only for the call that actually created it, so concurrent
    /// duplicates resolve to exactly one `true`.
    pub async fn insert_if_absent<C: ConnectionTrait>(
        db: &C,
        roll_number: &str,
        subject: &str,
        method: MarkMethod,
    ) -> Result<bool, DbErr> {
        let active = ActiveModel {
            roll_number: Set(roll_number.to_owned()),
            subject: Set(subject.to_owned()),
            taken_at: Set(Utc::now()),
            method: Set(method),
        };
        let inserted = Entity::insert(active)
            .on_conflict(
                OnConflict::columns([Column::RollNumber, Column::Subject])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(inserted == 1)
    }

    pub async fn find_one_for<C: ConnectionTrait>(
        db: &C,
        roll_number: &str,
        subject: &str,
    ) -> Result<Option<Self>, DbErr> {
        Records::find_one(
            db,
            &[
                FilterParam::eq("roll_number", roll_number),
                FilterParam::eq("subject", subject),
            ],
            None,
        )
        .await
    }

    pub async fn find_by_subject<C: ConnectionTrait>(
        db: &C,
        subject: &str,
    ) -> Result<Vec<Self>, DbErr> {
        Records::find_all(db, &[FilterParam::eq("subject", subject)], Some("roll_number")).await
    }

    pub async fn present_roll_numbers<C: ConnectionTrait>(
        db: &C,
        subject: &str,
    ) -> Result<Vec<String>, DbErr> {
        Ok(Self::find_by_subject(db, subject)
            .await?
            .into_iter()
            .map(|r| r.roll_number)
            .collect())
    }
}
