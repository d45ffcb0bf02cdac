use axum::{Json, extract::State};
use campussync_core::AppError;
use campussync_core::errors::ErrorResponse;
use campussync_models::Notice;
use tracing::instrument;

use crate::middleware::session::Authenticated;
use crate::modules::notices::service::NoticeService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/notices",
    responses(
        (status = 200, description = "Notices, newest first", body = Vec<Notice>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Academics",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _session))]
pub async fn get_notices(
    State(state): State<AppState>,
    Authenticated(_session): Authenticated,
) -> Result<Json<Vec<Notice>>, AppError> {
    Ok(Json(NoticeService::list_notices(&state.db).await?))
}
