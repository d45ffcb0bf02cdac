//! Assignment uploads and submissions.
//!
//! The document is stored first and its key recorded second. When the
//! database write fails the stored document is deleted again, so a failed
//! action leaves neither a row nor a file behind.

use std::sync::Arc;

use campussync_core::file_storage::sanitize_file_name;
use campussync_core::{AppError, FileStorage};
use campussync_db::{ConnectionSource, TransactionContext, WriteUnit};
use campussync_models::{DocumentUpload, SubmitAssignmentDto, UpcomingAssignment, UploadAssignmentDto};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::db::read_error;

const ASSIGNMENT_COLUMNS: &[&str] = &[
    "subject_id",
    "faculty_id",
    "title",
    "description",
    "due_date",
    "file_path",
];

const SUBMISSION_COLUMNS: &[&str] = &["assignment_id", "student_id", "file_path"];

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(source, storage, dto), fields(subject_id = %dto.subject_id))]
    pub async fn upload_assignment(
        source: Arc<dyn ConnectionSource>,
        storage: &dyn FileStorage,
        faculty_id: i32,
        dto: UploadAssignmentDto,
    ) -> Result<u64, AppError> {
        let stored_key = match &dto.file {
            Some(file) => {
                let prefix = format!("assignments/{}", dto.subject_id);
                Some(Self::store_document(storage, &prefix, file).await?)
            }
            None => None,
        };

        let description = Some(dto.description).filter(|d| !d.trim().is_empty());
        let unit = WriteUnit::single(
            "assignment",
            ASSIGNMENT_COLUMNS,
            vec![
                dto.subject_id.into_inner().into(),
                faculty_id.into(),
                dto.title.into(),
                description.into(),
                dto.due_date.into(),
                stored_key.clone().into(),
            ],
        );

        Self::record_or_discard(source, storage, unit, stored_key.as_deref()).await
    }

    #[instrument(skip(source, storage, dto), fields(assignment_id = %dto.assignment_id))]
    pub async fn submit_assignment(
        source: Arc<dyn ConnectionSource>,
        storage: &dyn FileStorage,
        student_id: i32,
        dto: SubmitAssignmentDto,
    ) -> Result<u64, AppError> {
        let prefix = format!("submissions/{}/{}", dto.assignment_id, student_id);
        let stored_key = Self::store_document(storage, &prefix, &dto.file).await?;

        let unit = WriteUnit::single(
            "assignment_submission",
            SUBMISSION_COLUMNS,
            vec![
                dto.assignment_id.into_inner().into(),
                student_id.into(),
                stored_key.clone().into(),
            ],
        );

        Self::record_or_discard(source, storage, unit, Some(&stored_key)).await
    }

    /// Assignments due today or later, soonest first.
    #[instrument(skip(db))]
    pub async fn list_upcoming(db: &PgPool) -> Result<Vec<UpcomingAssignment>, AppError> {
        sqlx::query_as::<_, UpcomingAssignment>(
            r#"SELECT a.assignment_id, a.title, a.description, a.due_date, s.subject_name
               FROM assignment a
               JOIN subject s ON s.subject_id = a.subject_id
               WHERE a.due_date >= CURRENT_DATE
               ORDER BY a.due_date ASC"#,
        )
        .fetch_all(db)
        .await
        .map_err(read_error)
    }

    async fn store_document(
        storage: &dyn FileStorage,
        prefix: &str,
        file: &DocumentUpload,
    ) -> Result<String, AppError> {
        let content = file
            .decode()
            .map_err(|_| AppError::bad_request(anyhow::anyhow!("Document is not valid base64")))?;

        let key = format!(
            "{}/{}-{}",
            prefix,
            Uuid::new_v4().simple(),
            sanitize_file_name(&file.file_name)
        );

        Ok(storage.save(&key, &content).await?)
    }

    async fn record_or_discard(
        source: Arc<dyn ConnectionSource>,
        storage: &dyn FileStorage,
        unit: WriteUnit,
        stored_key: Option<&str>,
    ) -> Result<u64, AppError> {
        match TransactionContext::apply(source, &[unit]).await {
            Ok(written) => Ok(written),
            Err(e) => {
                if let Some(key) = stored_key
                    && let Err(delete_err) = storage.delete(key).await
                {
                    tracing::warn!(storage.key = %key, error = %delete_err, "Orphaned document left in storage");
                }
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use campussync_core::LocalFileStorage;
    use campussync_db::{MemorySource, SqlParam};
    use campussync_models::ids::{AssignmentId, SubjectId};
    use chrono::NaiveDate;

    fn document(name: &str, content: &str) -> DocumentUpload {
        DocumentUpload {
            file_name: name.to_string(),
            content_base64: data_encoding::BASE64.encode(content.as_bytes()),
        }
    }

    fn files_under(dir: &std::path::Path) -> usize {
        fn walk(dir: &std::path::Path) -> usize {
            std::fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .flatten()
                        .map(|entry| {
                            let path = entry.path();
                            if path.is_dir() { walk(&path) } else { 1 }
                        })
                        .sum()
                })
                .unwrap_or(0)
        }
        walk(dir)
    }

    #[tokio::test]
    async fn test_submission_records_stored_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf(), "/uploads".to_string());
        let memory = MemorySource::new();
        let dto = SubmitAssignmentDto {
            assignment_id: AssignmentId(4),
            file: document("essay final.pdf", "%PDF-1.4"),
        };

        let written =
            AssignmentService::submit_assignment(Arc::new(memory.clone()), &storage, 7, dto)
                .await
                .unwrap();

        assert_eq!(written, 1);
        let rows = memory.rows("assignment_submission");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], SqlParam::Int(4));
        assert_eq!(rows[0][1], SqlParam::Int(7));
        let SqlParam::Text(key) = &rows[0][2] else {
            panic!("file path should be text");
        };
        assert!(key.starts_with("submissions/4/7/"));
        assert!(key.ends_with("-essay_final.pdf"));
        assert!(dir.path().join(key).exists());
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf(), "/uploads".to_string());
        let memory = MemorySource::new().with_reference("assignment_submission", "assignment_id", [1]);
        let dto = SubmitAssignmentDto {
            assignment_id: AssignmentId(4),
            file: document("essay.pdf", "%PDF-1.4"),
        };

        let err = AssignmentService::submit_assignment(Arc::new(memory.clone()), &storage, 7, dto)
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(memory.rows("assignment_submission").is_empty());
        assert_eq!(files_under(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_upload_without_document_stores_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf(), "/uploads".to_string());
        let memory = MemorySource::new();
        let dto = UploadAssignmentDto {
            subject_id: SubjectId(12),
            title: "Normalization".to_string(),
            description: "  ".to_string(),
            due_date: NaiveDate::from_ymd_opt(2030, 1, 15).unwrap(),
            file: None,
        };

        AssignmentService::upload_assignment(Arc::new(memory.clone()), &storage, 5, dto)
            .await
            .unwrap();

        let rows = memory.rows("assignment");
        assert_eq!(rows[0][1], SqlParam::Int(5));
        assert_eq!(rows[0][3], SqlParam::NullableText(None));
        assert_eq!(rows[0][5], SqlParam::NullableText(None));
    }

    #[tokio::test]
    async fn test_invalid_base64_is_rejected_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf(), "/uploads".to_string());
        let memory = MemorySource::new();
        let dto = SubmitAssignmentDto {
            assignment_id: AssignmentId(4),
            file: DocumentUpload {
                file_name: "essay.pdf".to_string(),
                content_base64: "not base64!".to_string(),
            },
        };

        let err = AssignmentService::submit_assignment(Arc::new(memory.clone()), &storage, 7, dto)
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(memory.acquisitions(), 0);
    }
}
