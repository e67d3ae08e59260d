use sea_orm::DatabaseConnection;

use crate::domain::types::CourseDefaults;
use crate::infra::db::{
    DbAuthCodeRepository, DbProgressRepository, DbPurchaseRepository, DbSessionRepository,
};
use crate::infra::mailer::AppNotifier;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: AppNotifier,
    pub defaults: CourseDefaults,
    pub cookie_domain: Option<String>,
}

impl AppState {
    pub fn auth_code_repo(&self) -> DbAuthCodeRepository {
        DbAuthCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn purchase_repo(&self) -> DbPurchaseRepository {
        DbPurchaseRepository {
            db: self.db.clone(),
        }
    }

    pub fn progress_repo(&self) -> DbProgressRepository {
        DbProgressRepository {
            db: self.db.clone(),
        }
    }

    pub fn notifier(&self) -> AppNotifier {
        self.notifier.clone()
    }
}
