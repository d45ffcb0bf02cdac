use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use campussync_auth::router::authorize_action;
use campussync_core::AppError;
use campussync_core::errors::ErrorResponse;
use campussync_models::ActionResponse;
use tracing::instrument;

use super::service::ActionService;
use crate::metrics::track_action;
use crate::middleware::session::{CurrentSession, deny};
use crate::state::AppState;

/// Perform a role-routed write action
///
/// | Action | Role |
/// |---|---|
/// | `addStudent`, `addFaculty`, `addCourse`, `addSubject`, `saveNotice` | admin |
/// | `saveAttendance`, `enterMarks`, `uploadAssignment` | faculty |
/// | `submitAssignmentFile` | student |
///
/// The JSON body is the payload of the named action.
#[utoipa::path(
    post,
    path = "/api/actions/{action}",
    params(
        ("action" = String, Path, description = "Action name, e.g. saveAttendance")
    ),
    request_body(
        content = String,
        content_type = "application/json",
        description = "Payload of the named action, e.g. SaveAttendanceDto for saveAttendance"
    ),
    responses(
        (status = 201, description = "Action applied", body = ActionResponse),
        (status = 400, description = "Malformed payload", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Session role may not perform this action", body = ErrorResponse),
        (status = 404, description = "Unknown action", body = ErrorResponse),
        (status = 409, description = "Rejected by a constraint; nothing applied", body = ErrorResponse),
        (status = 422, description = "Payload failed validation", body = ErrorResponse),
        (status = 503, description = "Database unavailable; nothing applied", body = ErrorResponse)
    ),
    tag = "Actions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current, body))]
pub async fn perform_action(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(action_name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<ActionResponse>), AppError> {
    let (action, actor) = authorize_action(current.session(), &action_name).map_err(deny)?;

    let result = ActionService::dispatch(&state, action, &actor, &body).await;
    track_action(action.name(), result.is_ok());
    let affected = result?;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse {
            action: action.name().to_string(),
            affected,
        }),
    ))
}
