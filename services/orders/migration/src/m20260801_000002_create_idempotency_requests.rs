use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IdempotencyRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IdempotencyRequests::KeyHash)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IdempotencyRequests::BodyHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IdempotencyRequests::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(IdempotencyRequests::StatusCode).integer())
                    .col(ColumnDef::new(IdempotencyRequests::ResponseBody).json_binary())
                    .col(
                        ColumnDef::new(IdempotencyRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(IdempotencyRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IdempotencyRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum IdempotencyRequests {
    Table,
    KeyHash,
    BodyHash,
    Status,
    StatusCode,
    ResponseBody,
    CreatedAt,
    UpdatedAt,
}
