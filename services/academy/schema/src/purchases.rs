use sea_orm::entity::prelude::*;

/// Completed course purchase, one row per payment-processor checkout session.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    #[sea_orm(unique)]
    pub external_session_id: String,
    pub external_customer_id: Option<String>,
    /// Minor currency units (cents).
    pub amount: i64,
    pub currency: String,
    pub course_slug: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
