use axum::{Router, routing::post};

use super::controller::perform_action;
use crate::state::AppState;

pub fn init_actions_router() -> Router<AppState> {
    Router::new().route("/{action}", post(perform_action))
}
