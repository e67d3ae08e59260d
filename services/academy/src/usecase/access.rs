use crate::domain::repository::{PurchaseRepository, SessionRepository};
use crate::error::AcademyError;
use crate::usecase::session::authenticate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessOutput {
    pub email: String,
    pub course_slug: String,
    pub has_access: bool,
}

/// Does the session's owner hold a completed purchase for the course?
/// Recomputed on every call.
pub struct CheckAccessUseCase<S: SessionRepository, P: PurchaseRepository> {
    pub sessions: S,
    pub purchases: P,
}

impl<S: SessionRepository, P: PurchaseRepository> CheckAccessUseCase<S, P> {
    pub async fn execute(&self, token: &str, course_slug: &str) -> Result<AccessOutput, AcademyError> {
        let email = authenticate(&self.sessions, token).await?;
        let has_access = self.purchases.has_completed(&email, course_slug).await?;
        Ok(AccessOutput {
            email,
            course_slug: course_slug.to_owned(),
            has_access,
        })
    }
}
