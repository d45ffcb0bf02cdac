use axum::{
    Json,
    extract::{Path, State},
};
use campussync_auth::router::authorize_student_record;
use campussync_core::AppError;
use campussync_core::errors::ErrorResponse;
use campussync_models::MarkRecord;
use campussync_models::ids::StudentId;
use tracing::instrument;

use crate::middleware::session::{CurrentSession, deny};
use crate::modules::marks::service::MarksService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/students/{student_id}/marks",
    params(
        ("student_id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Marks per subject", body = Vec<MarkRecord>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Another student's records", body = ErrorResponse)
    ),
    tag = "Marks",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn get_student_marks(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(student_id): Path<StudentId>,
) -> Result<Json<Vec<MarkRecord>>, AppError> {
    authorize_student_record(current.session(), student_id.into_inner()).map_err(deny)?;

    Ok(Json(MarksService::list_for_student(&state.db, student_id).await?))
}
