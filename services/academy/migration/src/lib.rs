pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_auth_codes;
mod m20261019_000002_create_sessions;
mod m20261019_000003_create_purchases;
mod m20261019_000004_create_user_progress;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_auth_codes::Migration),
            Box::new(m20261019_000002_create_sessions::Migration),
            Box::new(m20261019_000003_create_purchases::Migration),
            Box::new(m20261019_000004_create_user_progress::Migration),
        ]
    }
}
