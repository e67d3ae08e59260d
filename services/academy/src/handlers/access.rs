use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use academy_auth_types::credential::SessionToken;

use crate::error::AcademyError;
use crate::state::AppState;
use crate::usecase::access::CheckAccessUseCase;

#[derive(Deserialize)]
pub struct CourseQuery {
    pub course: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    pub has_access: bool,
    pub email: String,
    pub course: String,
}

/// `GET /api/access?course=<slug>`
pub async fn check_access(
    State(state): State<AppState>,
    token: SessionToken,
    Query(query): Query<CourseQuery>,
) -> Result<Json<AccessResponse>, AcademyError> {
    let course = query
        .course
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.defaults.course_slug.clone());

    let usecase = CheckAccessUseCase {
        sessions: state.session_repo(),
        purchases: state.purchase_repo(),
    };
    let out = usecase.execute(token.as_str(), &course).await?;

    Ok(Json(AccessResponse {
        has_access: out.has_access,
        email: out.email,
        course: out.course_slug,
    }))
}
