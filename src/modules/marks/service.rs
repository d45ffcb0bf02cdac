use std::sync::Arc;

use campussync_core::AppError;
use campussync_db::{ConnectionSource, TransactionContext, WriteUnit};
use campussync_models::ids::StudentId;
use campussync_models::{EnterMarksDto, MarkRecord};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::read_error;

const MARKS_COLUMNS: &[&str] = &["student_id", "subject_id", "marks"];

pub struct MarksService;

impl MarksService {
    #[instrument(skip(source))]
    pub async fn enter_marks(
        source: Arc<dyn ConnectionSource>,
        dto: EnterMarksDto,
    ) -> Result<u64, AppError> {
        let unit = WriteUnit::single(
            "marks",
            MARKS_COLUMNS,
            vec![
                dto.student_id.into_inner().into(),
                dto.subject_id.into_inner().into(),
                dto.marks.into(),
            ],
        );
        Ok(TransactionContext::apply(source, &[unit]).await?)
    }

    #[instrument(skip(db))]
    pub async fn list_for_student(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<Vec<MarkRecord>, AppError> {
        sqlx::query_as::<_, MarkRecord>(
            r#"SELECT s.subject_name, m.marks
               FROM marks m
               JOIN subject s ON s.subject_id = m.subject_id
               WHERE m.student_id = $1
               ORDER BY s.subject_name"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(read_error)
    }
}
