use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010003_create_attendance_records"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign key on roll_number: manual marks may name a student
        // that has not been enrolled or logged in yet.
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance_records"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("roll_number")).string().not_null())
                    .col(ColumnDef::new(Alias::new("subject")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("taken_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("method"))
                            .string_len(16)
                            .not_null()
                            .default("scan"),
                    )
                    .primary_key(
                        Index::create()
                            .col(Alias::new("roll_number"))
                            .col(Alias::new("subject")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("attendance_records")).to_owned())
            .await
    }
}
