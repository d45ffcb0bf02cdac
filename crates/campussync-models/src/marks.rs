use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{StudentId, SubjectId};

/// Payload of the `enterMarks` action.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct EnterMarksDto {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    #[validate(range(min = 0, max = 100))]
    pub marks: i32,
}

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct MarkRecord {
    pub subject_name: String,
    pub marks: i32,
}
