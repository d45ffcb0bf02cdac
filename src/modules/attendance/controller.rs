use axum::{
    Json,
    extract::{Path, State},
};
use campussync_auth::router::authorize_student_record;
use campussync_core::AppError;
use campussync_core::errors::ErrorResponse;
use campussync_models::ids::StudentId;
use campussync_models::{AttendanceRecord, AttendanceSummary};
use tracing::instrument;

use crate::middleware::session::{CurrentSession, deny};
use crate::modules::attendance::service::AttendanceService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/students/{student_id}/attendance",
    params(
        ("student_id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Attendance rows, newest first", body = Vec<AttendanceRecord>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Another student's records", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(student_id): Path<StudentId>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    authorize_student_record(current.session(), student_id.into_inner()).map_err(deny)?;

    let records = AttendanceService::list_for_student(&state.db, student_id).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/students/{student_id}/attendance/summary",
    params(
        ("student_id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Attendance percentage per subject", body = Vec<AttendanceSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Another student's records", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn get_attendance_summary(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(student_id): Path<StudentId>,
) -> Result<Json<Vec<AttendanceSummary>>, AppError> {
    authorize_student_record(current.session(), student_id.into_inner()).map_err(deny)?;

    let summary = AttendanceService::summary_for_student(&state.db, student_id).await?;
    Ok(Json(summary))
}
