use axum::{Router, routing::get};

use crate::modules::notices::controller::get_notices;
use crate::state::AppState;

pub fn init_notices_router() -> Router<AppState> {
    Router::new().route("/", get(get_notices))
}
