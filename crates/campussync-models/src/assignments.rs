//! Assignments, submissions, and the document payload they carry.

use chrono::NaiveDate;
use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{AssignmentId, SubjectId};

/// An uploaded document, base64-encoded inside the JSON body.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct DocumentUpload {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "essay.pdf")]
    pub file_name: String,
    #[validate(length(min = 1))]
    pub content_base64: String,
}

impl DocumentUpload {
    pub fn decode(&self) -> Result<Vec<u8>, data_encoding::DecodeError> {
        BASE64.decode(self.content_base64.trim().as_bytes())
    }
}

/// Payload of the `uploadAssignment` action.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct UploadAssignmentDto {
    pub subject_id: SubjectId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,
    #[validate(nested)]
    pub file: Option<DocumentUpload>,
}

/// Payload of the `submitAssignmentFile` action. The submitting student is
/// always the session's identity.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct SubmitAssignmentDto {
    pub assignment_id: AssignmentId,
    #[validate(nested)]
    pub file: DocumentUpload,
}

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct UpcomingAssignment {
    pub assignment_id: AssignmentId,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,
    pub subject_name: String,
}
