use axum::{Router, routing::get};

use crate::modules::faculty::controller::get_faculty;
use crate::state::AppState;

pub fn init_faculty_router() -> Router<AppState> {
    Router::new().route("/", get(get_faculty))
}
