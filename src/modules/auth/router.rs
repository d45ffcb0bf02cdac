use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{login, logout, me};
use crate::state::AppState;

/// Login is split out so a stricter rate limit can wrap it alone.
pub fn init_login_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}
