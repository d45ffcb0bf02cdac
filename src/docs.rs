use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use campussync_core::errors::ErrorResponse;
use campussync_models::{
    ActionResponse, AttendanceRecord, AttendanceSummary, Course, CreateCourseDto,
    CreateFacultyDto, CreateNoticeDto, CreateStudentDto, CreateSubjectDto, DocumentUpload,
    EnterMarksDto, Faculty, IdentityResponse, LoginRequest, LoginResponse, MarkRecord,
    MessageResponse, Notice, Role, SaveAttendanceDto, Student, SubjectView, SubmitAssignmentDto,
    UpcomingAssignment, UploadAssignmentDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::actions::controller::perform_action,
        crate::modules::students::controller::get_students,
        crate::modules::attendance::controller::get_student_attendance,
        crate::modules::attendance::controller::get_attendance_summary,
        crate::modules::marks::controller::get_student_marks,
        crate::modules::faculty::controller::get_faculty,
        crate::modules::courses::controller::get_courses,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::notices::controller::get_notices,
        crate::modules::assignments::controller::get_upcoming_assignments,
    ),
    components(
        schemas(
            Role,
            LoginRequest,
            LoginResponse,
            IdentityResponse,
            MessageResponse,
            ActionResponse,
            ErrorResponse,
            Student,
            CreateStudentDto,
            Faculty,
            CreateFacultyDto,
            Course,
            CreateCourseDto,
            SubjectView,
            CreateSubjectDto,
            Notice,
            CreateNoticeDto,
            SaveAttendanceDto,
            AttendanceRecord,
            AttendanceSummary,
            EnterMarksDto,
            MarkRecord,
            DocumentUpload,
            UploadAssignmentDto,
            SubmitAssignmentDto,
            UpcomingAssignment,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, logout and the current identity"),
        (name = "Actions", description = "Role-routed write actions"),
        (name = "Students", description = "Student records"),
        (name = "Faculty", description = "Faculty records"),
        (name = "Academics", description = "Courses, subjects and notices"),
        (name = "Attendance", description = "Attendance rows and percentages"),
        (name = "Marks", description = "Marks per subject"),
        (name = "Assignments", description = "Assignments and submissions")
    ),
    info(
        title = "CampusSync API",
        version = "0.1.0",
        description = "Campus administration backend: role-routed writes over explicit transactions.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Opaque session token")
                        .build(),
                ),
            )
        }
    }
}
