use std::sync::Arc;

use campussync_core::{AppError, CoreError};
use campussync_db::{ConnectionSource, TransactionContext, WriteUnit};
use campussync_models::ids::{CourseId, FacultyId};
use campussync_models::{CreateSubjectDto, SubjectView};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::read_error;

const SUBJECT_COLUMNS: &[&str] = &["subject_name", "course_id", "faculty_id"];

pub struct SubjectService;

impl SubjectService {
    /// Inserts one subject row on an already active context.
    ///
    /// Course and faculty ids are not checked here; the foreign keys reject
    /// unknown ones. Returns `true` iff exactly one row was written. Neither
    /// commits nor rolls back: that belongs to whoever began `ctx`.
    #[instrument(skip(ctx), fields(tx_state = %ctx.state()))]
    pub async fn add_subject_transactional(
        ctx: &mut TransactionContext,
        subject_name: &str,
        course_id: CourseId,
        faculty_id: FacultyId,
    ) -> Result<bool, CoreError> {
        let unit = WriteUnit::single(
            "subject",
            SUBJECT_COLUMNS,
            vec![
                subject_name.into(),
                course_id.into_inner().into(),
                faculty_id.into_inner().into(),
            ],
        );

        let inserted = ctx.execute(&unit).await?;
        Ok(inserted == 1)
    }

    /// begin, insert, then commit on `true` and roll back otherwise. The
    /// context is closed on every path.
    #[instrument(skip(source, dto), fields(subject_name = %dto.subject_name))]
    pub async fn create_subject(
        source: Arc<dyn ConnectionSource>,
        dto: CreateSubjectDto,
    ) -> Result<bool, CoreError> {
        let mut ctx = TransactionContext::new(source);
        ctx.begin().await?;

        let outcome =
            Self::add_subject_transactional(&mut ctx, &dto.subject_name, dto.course_id, dto.faculty_id)
                .await;

        ctx.settle(outcome).await
    }

    #[instrument(skip(db))]
    pub async fn list_subjects(db: &PgPool) -> Result<Vec<SubjectView>, AppError> {
        sqlx::query_as::<_, SubjectView>(
            r#"SELECT s.subject_id, s.subject_name, c.course_name, f.name AS faculty_name
               FROM subject s
               LEFT JOIN course c ON c.course_id = s.course_id
               LEFT JOIN faculty f ON f.faculty_id = s.faculty_id
               ORDER BY s.subject_id"#,
        )
        .fetch_all(db)
        .await
        .map_err(read_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campussync_core::{TransactionError, WriteError};
    use campussync_db::{MemorySource, SqlParam, TxState};

    fn source() -> MemorySource {
        MemorySource::new()
            .with_reference("subject", "course_id", [3])
            .with_reference("subject", "faculty_id", [5])
    }

    #[tokio::test]
    async fn test_add_subject_requires_active_context() {
        let mut ctx = TransactionContext::new(Arc::new(source()));

        let result =
            SubjectService::add_subject_transactional(&mut ctx, "DB Systems", CourseId(3), FacultyId(5))
                .await;

        assert_eq!(result, Err(CoreError::Transaction(TransactionError::NotActive)));
    }

    #[tokio::test]
    async fn test_subject_row_durable_after_commit() {
        let memory = source();
        let mut ctx = TransactionContext::new(Arc::new(memory.clone()));

        ctx.begin().await.unwrap();
        let inserted =
            SubjectService::add_subject_transactional(&mut ctx, "DB Systems", CourseId(3), FacultyId(5))
                .await
                .unwrap();
        assert!(inserted);
        ctx.commit().await.unwrap();
        ctx.close().await;

        assert_eq!(ctx.state(), TxState::Closed);
        assert_eq!(
            memory.rows("subject"),
            vec![vec![
                SqlParam::Text("DB Systems".to_string()),
                SqlParam::Int(3),
                SqlParam::Int(5),
            ]]
        );
        assert_eq!(memory.releases(), 1);
    }

    #[tokio::test]
    async fn test_create_subject_with_unknown_course_leaves_no_row() {
        let memory = source();
        let dto = CreateSubjectDto {
            subject_name: "Compilers".to_string(),
            course_id: CourseId(99),
            faculty_id: FacultyId(5),
        };

        let result = SubjectService::create_subject(Arc::new(memory.clone()), dto).await;

        assert!(matches!(
            result,
            Err(CoreError::Write(WriteError::ConstraintViolation(_)))
        ));
        assert!(memory.rows("subject").is_empty());
        assert_eq!(memory.acquisitions(), 1);
    }

    #[tokio::test]
    async fn test_create_subject_commits() {
        let memory = source();
        let dto = CreateSubjectDto {
            subject_name: "DB Systems".to_string(),
            course_id: CourseId(3),
            faculty_id: FacultyId(5),
        };

        let created = SubjectService::create_subject(Arc::new(memory.clone()), dto)
            .await
            .unwrap();

        assert!(created);
        assert_eq!(memory.rows("subject").len(), 1);
    }
}
