//! Students and faculty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{FacultyId, StudentId};

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct Student {
    pub student_id: StudentId,
    pub name: String,
    pub email: String,
    pub course: String,
    pub semester: i32,
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct Faculty {
    pub faculty_id: FacultyId,
    pub name: String,
    pub email: String,
    pub department: String,
}

/// Payload of the `addStudent` action.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub course: String,
    #[validate(range(min = 1, max = 12))]
    pub semester: i32,
}

/// Payload of the `addFaculty` action.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateFacultyDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub department: String,
}
