use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::{Json, Router, middleware, routing::get};
use campussync_config::RateLimitConfig;
use serde_json::{Value, json};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::actions::init_actions_router;
use crate::modules::assignments::init_assignments_router;
use crate::modules::auth::init_auth_router;
use crate::modules::auth::router::init_login_router;
use crate::modules::courses::init_courses_router;
use crate::modules::faculty::init_faculty_router;
use crate::modules::notices::init_notices_router;
use crate::modules::students::init_students_router;
use crate::modules::subjects::init_subjects_router;
use crate::state::AppState;

/// Application router without rate limiting.
pub fn init_router(state: AppState) -> Router {
    build_router(state, None)
}

/// Application router with per-IP rate limits: a general limit on every
/// route and a stricter one on login. Must be served with connect info.
pub fn init_rate_limited_router(state: AppState) -> Router {
    let limits = state.rate_limit_config.clone();
    build_router(state, Some(&limits))
}

fn build_router(state: AppState, limits: Option<&RateLimitConfig>) -> Router {
    let login = match limits {
        Some(limits) => init_login_router().layer(GovernorLayer::new(Arc::new(
            limits.login_governor_config(),
        ))),
        None => init_login_router(),
    };

    let api = Router::new()
        .nest("/auth", login.merge(init_auth_router()))
        .nest("/actions", init_actions_router())
        .nest("/students", init_students_router())
        .nest("/faculty", init_faculty_router())
        .nest("/courses", init_courses_router())
        .nest("/subjects", init_subjects_router())
        .nest("/notices", init_notices_router())
        .nest("/assignments", init_assignments_router());

    let api = match limits {
        Some(limits) => api.layer(GovernorLayer::new(Arc::new(
            limits.general_governor_config(),
        ))),
        None => api,
    };

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
