use axum::{Json, extract::State};
use campussync_core::AppError;
use campussync_core::errors::ErrorResponse;
use campussync_models::Course;
use tracing::instrument;

use crate::middleware::session::Authenticated;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "All courses by name", body = Vec<Course>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Academics",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _session))]
pub async fn get_courses(
    State(state): State<AppState>,
    Authenticated(_session): Authenticated,
) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(CourseService::list_courses(&state.db).await?))
}
