#![allow(async_fn_in_trait)]

use std::future::Future;

use uuid::Uuid;

use crate::domain::types::{AuthCode, CourseProgress, InsertOutcome, OutgoingEmail, Purchase, Session};
use crate::error::{AcademyError, NotifyError};

/// Repository for one-time login codes.
pub trait AuthCodeRepository: Send + Sync {
    /// Mark every unused code for the email as used. Returns how many were invalidated.
    async fn invalidate_unused(&self, email: &str) -> Result<u64, AcademyError>;

    async fn create(&self, code: &AuthCode) -> Result<(), AcademyError>;

    /// Newest unused, unexpired code matching email + code string.
    async fn find_valid(&self, email: &str, code: &str)
    -> Result<Option<AuthCode>, AcademyError>;

    /// Conditional update: flips `used` only if the row is still unused and unexpired.
    /// Returns `true` iff this call consumed the code.
    async fn consume(&self, id: Uuid) -> Result<bool, AcademyError>;
}

/// Repository for signed-in sessions.
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), AcademyError>;

    /// Session for the token, if it exists and has not expired.
    async fn find_active(&self, token: &str) -> Result<Option<Session>, AcademyError>;

    /// Returns `true` if a row was deleted.
    async fn delete_by_token(&self, token: &str) -> Result<bool, AcademyError>;
}

/// Repository for course purchases.
pub trait PurchaseRepository: Send + Sync {
    async fn find_by_external_session_id(
        &self,
        external_session_id: &str,
    ) -> Result<Option<Purchase>, AcademyError>;

    /// Insert guarded by the unique `external_session_id` constraint; a violation
    /// is reported as `InsertOutcome::Duplicate`, not as an error.
    async fn insert(&self, purchase: &Purchase) -> Result<InsertOutcome, AcademyError>;

    async fn has_completed(&self, email: &str, course_slug: &str) -> Result<bool, AcademyError>;
}

/// Repository for per-course progress.
pub trait ProgressRepository: Send + Sync {
    async fn find(
        &self,
        email: &str,
        course_slug: &str,
    ) -> Result<Option<CourseProgress>, AcademyError>;

    /// Insert or replace the row for (email, course_slug).
    async fn upsert(&self, progress: &CourseProgress) -> Result<(), AcademyError>;
}

/// Outbound email sink. Delivery is best effort.
///
/// The returned future is `Send` so callers can run it on a detached task.
pub trait Notifier: Send + Sync {
    fn send(&self, email: OutgoingEmail) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
