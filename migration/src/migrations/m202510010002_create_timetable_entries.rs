use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010002_create_timetable_entries"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("timetable_entries"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("classroom")).string().not_null())
                    // 0 = Sunday ... 6 = Saturday
                    .col(ColumnDef::new(Alias::new("day_of_week")).integer().not_null())
                    // zero-padded "HH:MM", compared lexicographically
                    .col(ColumnDef::new(Alias::new("start_time")).string_len(5).not_null())
                    .col(ColumnDef::new(Alias::new("end_time")).string_len(5).not_null())
                    .col(ColumnDef::new(Alias::new("subject")).string().not_null())
                    .col(ColumnDef::new(Alias::new("lecturer_name")).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_timetable_classroom_day")
                    .table(Alias::new("timetable_entries"))
                    .col(Alias::new("classroom"))
                    .col(Alias::new("day_of_week"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("timetable_entries")).to_owned())
            .await
    }
}
