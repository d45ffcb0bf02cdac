use axum::{Json, extract::State};
use campussync_core::AppError;
use campussync_core::errors::ErrorResponse;
use campussync_models::{IdentityResponse, LoginRequest, LoginResponse, MessageResponse};
use tracing::instrument;

use super::service::AuthService;
use crate::middleware::session::Authenticated;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Login and receive a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 503, description = "Credential or session store unavailable", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = AuthService::login(&state.verifier, state.sessions.as_ref(), dto).await?;

    Ok(Json(LoginResponse {
        identity: IdentityResponse::from(&session.identity),
        token: session.token,
        expires_at: session.expires_at,
    }))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::logout(state.sessions.as_ref(), &session).await?;

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// Identity behind the current session
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current identity", body = IdentityResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(session))]
pub async fn me(Authenticated(session): Authenticated) -> Json<IdentityResponse> {
    Json(IdentityResponse::from(&session.identity))
}
