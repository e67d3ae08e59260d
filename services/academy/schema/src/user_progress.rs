use sea_orm::entity::prelude::*;

/// Per-course progress. Unique on (email, course_slug).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_progress")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub course_slug: String,
    /// JSON array of lesson ids.
    pub completed_lessons: Json,
    /// JSON array of module ids.
    pub completed_modules: Json,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
