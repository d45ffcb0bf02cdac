use axum::{Json, extract::State};
use campussync_core::AppError;
use campussync_core::errors::ErrorResponse;
use campussync_models::Faculty;
use tracing::instrument;

use crate::middleware::session::RequireAdmin;
use crate::modules::faculty::service::FacultyService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/faculty",
    responses(
        (status = 200, description = "All faculty members", body = Vec<Faculty>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    tag = "Faculty",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_faculty(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Faculty>>, AppError> {
    let faculty = FacultyService::list_faculty(&state.db).await?;
    Ok(Json(faculty))
}
