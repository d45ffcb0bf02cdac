use axum::{Json, extract::State};
use campussync_core::AppError;
use campussync_core::errors::ErrorResponse;
use campussync_models::SubjectView;
use tracing::instrument;

use crate::middleware::session::Authenticated;
use crate::modules::subjects::service::SubjectService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/subjects",
    responses(
        (status = 200, description = "Subjects with course and faculty names", body = Vec<SubjectView>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Academics",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _session))]
pub async fn get_subjects(
    State(state): State<AppState>,
    Authenticated(_session): Authenticated,
) -> Result<Json<Vec<SubjectView>>, AppError> {
    Ok(Json(SubjectService::list_subjects(&state.db).await?))
}
