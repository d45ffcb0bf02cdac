//! Courses, subjects and notices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{CourseId, FacultyId, NoticeId, SubjectId};

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct Course {
    pub course_id: CourseId,
    pub course_name: String,
}

/// A subject with its course and faculty names resolved. Either name is
/// `None` when the referenced row is gone.
#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct SubjectView {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub course_name: Option<String>,
    pub faculty_name: Option<String>,
}

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct Notice {
    pub notice_id: NoticeId,
    pub title: String,
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 100))]
    pub course_name: String,
}

/// Payload of the `addSubject` action.
///
/// Neither id is checked before the insert; a dangling reference is rejected
/// by the foreign keys and surfaces as a constraint violation.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 100))]
    pub subject_name: String,
    pub course_id: CourseId,
    pub faculty_id: FacultyId,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateNoticeDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
}
