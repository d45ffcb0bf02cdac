//! # CampusSync Models
//!
//! Domain models and DTOs for the CampusSync API.
//!
//! # Modules
//!
//! - [`ids`]: strongly-typed integer ids per table
//! - [`roles`]: the three campus roles
//! - [`auth`]: login/session payloads
//! - [`people`]: students and faculty
//! - [`academics`]: courses, subjects, notices
//! - [`attendance`]: attendance submissions and read views
//! - [`marks`]: marks entry and read views
//! - [`assignments`]: assignment upload/submission and document payloads
//!
//! # Example
//!
//! ```ignore
//! use campussync_models::{Role, SaveAttendanceDto, ids::SubjectId};
//!
//! let role: Role = "faculty".parse()?;
//! ```

pub mod academics;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod ids;
pub mod marks;
pub mod people;
pub mod roles;

// Re-export commonly used types at crate root for convenience
pub use academics::{Course, CreateCourseDto, CreateNoticeDto, CreateSubjectDto, Notice, SubjectView};
pub use assignments::{DocumentUpload, SubmitAssignmentDto, UpcomingAssignment, UploadAssignmentDto};
pub use attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary, SaveAttendanceDto};
pub use auth::{IdentityResponse, LoginRequest, LoginResponse, MessageResponse};
pub use ids::{AdminId, AssignmentId, CourseId, FacultyId, NoticeId, StudentId, SubjectId};
pub use marks::{EnterMarksDto, MarkRecord};
pub use people::{CreateFacultyDto, CreateStudentDto, Faculty, Student};
pub use roles::Role;

use serde::Serialize;
use utoipa::ToSchema;

/// Result of a role-routed write action.
#[derive(Serialize, Debug, ToSchema, PartialEq, Eq)]
pub struct ActionResponse {
    pub action: String,
    /// Rows written by the action.
    pub affected: u64,
}
