use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Purchases::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Purchases::Email).string().not_null())
                    // Natural idempotency key for webhook redelivery.
                    .col(
                        ColumnDef::new(Purchases::ExternalSessionId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Purchases::ExternalCustomerId).string())
                    .col(ColumnDef::new(Purchases::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Purchases::Currency).string().not_null())
                    .col(ColumnDef::new(Purchases::CourseSlug).string().not_null())
                    .col(
                        ColumnDef::new(Purchases::Status)
                            .string()
                            .not_null()
                            .default("completed"),
                    )
                    .col(
                        ColumnDef::new(Purchases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Purchases::Table)
                    .col(Purchases::Email)
                    .col(Purchases::CourseSlug)
                    .name("idx_purchases_email_course_slug")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Purchases::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Purchases {
    Table,
    Id,
    Email,
    ExternalSessionId,
    ExternalCustomerId,
    Amount,
    Currency,
    CourseSlug,
    Status,
    CreatedAt,
}
