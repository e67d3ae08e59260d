use chrono::Utc;

use crate::domain::repository::{ProgressRepository, SessionRepository};
use crate::domain::types::CourseProgress;
use crate::error::AcademyError;
use crate::usecase::session::authenticate;

// ── GetProgress ──────────────────────────────────────────────────────────────

pub struct GetProgressUseCase<S: SessionRepository, G: ProgressRepository> {
    pub sessions: S,
    pub progress: G,
}

impl<S: SessionRepository, G: ProgressRepository> GetProgressUseCase<S, G> {
    /// `None` when nothing has been saved for the course yet.
    pub async fn execute(
        &self,
        token: &str,
        course_slug: &str,
    ) -> Result<Option<CourseProgress>, AcademyError> {
        let email = authenticate(&self.sessions, token).await?;
        self.progress.find(&email, course_slug).await
    }
}

// ── SaveProgress ─────────────────────────────────────────────────────────────

pub struct SaveProgressInput {
    pub course_slug: String,
    pub completed_lessons: Vec<String>,
    pub completed_modules: Vec<String>,
}

pub struct SaveProgressUseCase<S: SessionRepository, G: ProgressRepository> {
    pub sessions: S,
    pub progress: G,
}

impl<S: SessionRepository, G: ProgressRepository> SaveProgressUseCase<S, G> {
    /// Replaces the stored lists wholesale (last write wins).
    pub async fn execute(
        &self,
        token: &str,
        input: SaveProgressInput,
    ) -> Result<CourseProgress, AcademyError> {
        let email = authenticate(&self.sessions, token).await?;
        let progress = CourseProgress {
            email,
            course_slug: input.course_slug,
            completed_lessons: input.completed_lessons,
            completed_modules: input.completed_modules,
            updated_at: Utc::now(),
        };
        self.progress.upsert(&progress).await?;
        Ok(progress)
    }
}
