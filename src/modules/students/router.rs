use axum::{Router, routing::get};

use crate::modules::attendance::controller::{get_attendance_summary, get_student_attendance};
use crate::modules::marks::controller::get_student_marks;
use crate::modules::students::controller::get_students;
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students))
        .route("/{student_id}/attendance", get(get_student_attendance))
        .route(
            "/{student_id}/attendance/summary",
            get(get_attendance_summary),
        )
        .route("/{student_id}/marks", get(get_student_marks))
}
