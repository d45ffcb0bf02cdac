use axum::{Router, routing::get};

use crate::modules::assignments::controller::get_upcoming_assignments;
use crate::state::AppState;

pub fn init_assignments_router() -> Router<AppState> {
    Router::new().route("/upcoming", get(get_upcoming_assignments))
}
