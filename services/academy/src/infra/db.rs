use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use academy_schema::{auth_codes, purchases, sessions, user_progress};

use crate::domain::repository::{
    AuthCodeRepository, ProgressRepository, PurchaseRepository, SessionRepository,
};
use crate::domain::types::{
    AuthCode, CourseProgress, InsertOutcome, Purchase, PurchaseStatus, Session,
};
use crate::error::AcademyError;

// ── AuthCode repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuthCodeRepository {
    pub db: DatabaseConnection,
}

impl AuthCodeRepository for DbAuthCodeRepository {
    async fn invalidate_unused(&self, email: &str) -> Result<u64, AcademyError> {
        let result = auth_codes::Entity::update_many()
            .col_expr(auth_codes::Column::Used, Expr::value(true))
            .filter(auth_codes::Column::Email.eq(email))
            .filter(auth_codes::Column::Used.eq(false))
            .exec(&self.db)
            .await
            .context("invalidate unused authcodes")?;
        Ok(result.rows_affected)
    }

    async fn create(&self, code: &AuthCode) -> Result<(), AcademyError> {
        auth_codes::ActiveModel {
            id: Set(code.id),
            email: Set(code.email.clone()),
            code: Set(code.code.clone()),
            expires_at: Set(code.expires_at),
            used: Set(code.used),
            created_at: Set(code.created_at),
        }
        .insert(&self.db)
        .await
        .context("create authcode")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<AuthCode>, AcademyError> {
        let now = Utc::now();
        let model = auth_codes::Entity::find()
            .filter(auth_codes::Column::Email.eq(email))
            .filter(auth_codes::Column::Code.eq(code))
            .filter(auth_codes::Column::Used.eq(false))
            .filter(auth_codes::Column::ExpiresAt.gt(now))
            .order_by_desc(auth_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find valid authcode")?;
        Ok(model.map(authcode_from_model))
    }

    async fn consume(&self, id: Uuid) -> Result<bool, AcademyError> {
        let now = Utc::now();
        // UPDATE ... WHERE id = $1 AND used = false AND expires_at > now()
        let result = auth_codes::Entity::update_many()
            .col_expr(auth_codes::Column::Used, Expr::value(true))
            .filter(auth_codes::Column::Id.eq(id))
            .filter(auth_codes::Column::Used.eq(false))
            .filter(auth_codes::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await
            .context("consume authcode")?;
        Ok(result.rows_affected == 1)
    }
}

fn authcode_from_model(model: auth_codes::Model) -> AuthCode {
    AuthCode {
        id: model.id,
        email: model.email,
        code: model.code,
        expires_at: model.expires_at,
        used: model.used,
        created_at: model.created_at,
    }
}

// ── Session repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), AcademyError> {
        sessions::ActiveModel {
            id: Set(session.id),
            email: Set(session.email.clone()),
            token: Set(session.token.clone()),
            expires_at: Set(session.expires_at),
            created_at: Set(session.created_at),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(())
    }

    async fn find_active(&self, token: &str) -> Result<Option<Session>, AcademyError> {
        let now = Utc::now();
        let model = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .filter(sessions::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find active session")?;
        Ok(model.map(session_from_model))
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, AcademyError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(&self.db)
            .await
            .context("delete session")?;
        Ok(result.rows_affected > 0)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        email: model.email,
        token: model.token,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}

// ── Purchase repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPurchaseRepository {
    pub db: DatabaseConnection,
}

impl PurchaseRepository for DbPurchaseRepository {
    async fn find_by_external_session_id(
        &self,
        external_session_id: &str,
    ) -> Result<Option<Purchase>, AcademyError> {
        let model = purchases::Entity::find()
            .filter(purchases::Column::ExternalSessionId.eq(external_session_id))
            .one(&self.db)
            .await
            .context("find purchase by external session id")?;
        model.map(purchase_from_model).transpose()
    }

    async fn insert(&self, purchase: &Purchase) -> Result<InsertOutcome, AcademyError> {
        let result = purchases::ActiveModel {
            id: Set(purchase.id),
            email: Set(purchase.email.clone()),
            external_session_id: Set(purchase.external_session_id.clone()),
            external_customer_id: Set(purchase.external_customer_id.clone()),
            amount: Set(purchase.amount),
            currency: Set(purchase.currency.clone()),
            course_slug: Set(purchase.course_slug.clone()),
            status: Set(purchase.status.as_str().to_owned()),
            created_at: Set(purchase.created_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert purchase").into()),
        }
    }

    async fn has_completed(&self, email: &str, course_slug: &str) -> Result<bool, AcademyError> {
        let model = purchases::Entity::find()
            .filter(purchases::Column::Email.eq(email))
            .filter(purchases::Column::CourseSlug.eq(course_slug))
            .filter(purchases::Column::Status.eq(PurchaseStatus::Completed.as_str()))
            .one(&self.db)
            .await
            .context("find completed purchase")?;
        Ok(model.is_some())
    }
}

fn purchase_from_model(model: purchases::Model) -> Result<Purchase, AcademyError> {
    let status = PurchaseStatus::parse(&model.status)
        .with_context(|| format!("unknown purchase status {:?}", model.status))?;
    Ok(Purchase {
        id: model.id,
        email: model.email,
        external_session_id: model.external_session_id,
        external_customer_id: model.external_customer_id,
        amount: model.amount,
        currency: model.currency,
        course_slug: model.course_slug,
        status,
        created_at: model.created_at,
    })
}

// ── Progress repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProgressRepository {
    pub db: DatabaseConnection,
}

impl ProgressRepository for DbProgressRepository {
    async fn find(
        &self,
        email: &str,
        course_slug: &str,
    ) -> Result<Option<CourseProgress>, AcademyError> {
        let model = user_progress::Entity::find()
            .filter(user_progress::Column::Email.eq(email))
            .filter(user_progress::Column::CourseSlug.eq(course_slug))
            .one(&self.db)
            .await
            .context("find user progress")?;
        model.map(progress_from_model).transpose()
    }

    async fn upsert(&self, progress: &CourseProgress) -> Result<(), AcademyError> {
        let row = user_progress::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(progress.email.clone()),
            course_slug: Set(progress.course_slug.clone()),
            completed_lessons: Set(progress.completed_lessons.clone().into()),
            completed_modules: Set(progress.completed_modules.clone().into()),
            updated_at: Set(progress.updated_at),
        };
        user_progress::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    user_progress::Column::Email,
                    user_progress::Column::CourseSlug,
                ])
                .update_columns([
                    user_progress::Column::CompletedLessons,
                    user_progress::Column::CompletedModules,
                    user_progress::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert user progress")?;
        Ok(())
    }
}

fn progress_from_model(model: user_progress::Model) -> Result<CourseProgress, AcademyError> {
    let completed_lessons: Vec<String> = serde_json::from_value(model.completed_lessons)
        .context("decode completed_lessons")?;
    let completed_modules: Vec<String> = serde_json::from_value(model.completed_modules)
        .context("decode completed_modules")?;
    Ok(CourseProgress {
        email: model.email,
        course_slug: model.course_slug,
        completed_lessons,
        completed_modules,
        updated_at: model.updated_at,
    })
}
