use axum::{Json, extract::State};
use campussync_core::AppError;
use campussync_core::errors::ErrorResponse;
use campussync_models::UpcomingAssignment;
use tracing::instrument;

use crate::middleware::session::Authenticated;
use crate::modules::assignments::service::AssignmentService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/assignments/upcoming",
    responses(
        (status = 200, description = "Assignments due today or later", body = Vec<UpcomingAssignment>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Assignments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _session))]
pub async fn get_upcoming_assignments(
    State(state): State<AppState>,
    Authenticated(_session): Authenticated,
) -> Result<Json<Vec<UpcomingAssignment>>, AppError> {
    Ok(Json(AssignmentService::list_upcoming(&state.db).await?))
}
