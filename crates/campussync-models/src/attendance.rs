//! Attendance submissions and read views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{StudentId, SubjectId};

/// Stored status code of an attendance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "A")]
    Absent,
}

impl AttendanceStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Present => "P",
            Self::Absent => "A",
        }
    }
}

/// Payload of the `saveAttendance` action: the students present for one
/// subject on one date. Students not listed get no row.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct SaveAttendanceDto {
    pub subject_id: SubjectId,
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub present: Vec<StudentId>,
}

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct AttendanceRecord {
    pub subject_name: String,
    #[schema(value_type = String, format = Date)]
    pub att_date: NaiveDate,
    pub status: String,
}

/// Per-subject attendance for one student.
///
/// `held` counts the distinct dates on which attendance was taken for the
/// subject; a date on which the student has no row counts as missed.
#[derive(Serialize, Debug, ToSchema, PartialEq)]
pub struct AttendanceSummary {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub attended: i64,
    pub held: i64,
    pub percentage: f64,
}

impl AttendanceSummary {
    pub fn percentage_of(attended: i64, held: i64) -> f64 {
        if held <= 0 {
            return 0.0;
        }
        let raw = attended as f64 * 100.0 / held as f64;
        (raw * 100.0).round() / 100.0
    }
}
