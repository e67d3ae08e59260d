use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use academy_auth_types::credential::SessionToken;
use academy_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};

use crate::error::AcademyError;
use crate::handlers::access::CourseQuery;
use crate::state::AppState;
use crate::usecase::progress::{GetProgressUseCase, SaveProgressInput, SaveProgressUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub completed_lessons: Vec<String>,
    pub completed_modules: Vec<String>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `GET /api/progress?course=<slug>`
pub async fn get_progress(
    State(state): State<AppState>,
    token: SessionToken,
    Query(query): Query<CourseQuery>,
) -> Result<Json<ProgressResponse>, AcademyError> {
    let course = query
        .course
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.defaults.course_slug.clone());

    let usecase = GetProgressUseCase {
        sessions: state.session_repo(),
        progress: state.progress_repo(),
    };
    let body = match usecase.execute(token.as_str(), &course).await? {
        Some(p) => ProgressResponse {
            completed_lessons: p.completed_lessons,
            completed_modules: p.completed_modules,
            updated_at: Some(p.updated_at),
        },
        None => ProgressResponse {
            completed_lessons: vec![],
            completed_modules: vec![],
            updated_at: None,
        },
    };
    Ok(Json(body))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressRequest {
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    #[serde(default)]
    pub completed_modules: Vec<String>,
    #[serde(default)]
    pub course_slug: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressResponse {
    pub ok: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

/// `PUT /api/progress`
pub async fn put_progress(
    State(state): State<AppState>,
    token: SessionToken,
    payload: Result<Json<SaveProgressRequest>, JsonRejection>,
) -> Result<Json<SaveProgressResponse>, AcademyError> {
    let Json(body) = payload.map_err(|_| AcademyError::InvalidPayload)?;
    let course_slug = body
        .course_slug
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.defaults.course_slug.clone());

    let usecase = SaveProgressUseCase {
        sessions: state.session_repo(),
        progress: state.progress_repo(),
    };
    let saved = usecase
        .execute(
            token.as_str(),
            SaveProgressInput {
                course_slug,
                completed_lessons: body.completed_lessons,
                completed_modules: body.completed_modules,
            },
        )
        .await?;

    Ok(Json(SaveProgressResponse {
        ok: true,
        updated_at: saved.updated_at,
    }))
}
