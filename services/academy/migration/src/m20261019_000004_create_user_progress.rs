use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProgress::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProgress::Email).string().not_null())
                    .col(ColumnDef::new(UserProgress::CourseSlug).string().not_null())
                    .col(
                        ColumnDef::new(UserProgress::CompletedLessons)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProgress::CompletedModules)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProgress::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Upsert target.
        manager
            .create_index(
                Index::create()
                    .table(UserProgress::Table)
                    .col(UserProgress::Email)
                    .col(UserProgress::CourseSlug)
                    .unique()
                    .name("uq_user_progress_email_course_slug")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProgress::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserProgress {
    Table,
    Id,
    Email,
    CourseSlug,
    CompletedLessons,
    CompletedModules,
    UpdatedAt,
}
