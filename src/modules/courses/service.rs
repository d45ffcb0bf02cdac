use std::sync::Arc;

use campussync_core::AppError;
use campussync_db::{ConnectionSource, TransactionContext, WriteUnit};
use campussync_models::{Course, CreateCourseDto};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::read_error;

pub struct CourseService;

impl CourseService {
    #[instrument(skip(source))]
    pub async fn create_course(
        source: Arc<dyn ConnectionSource>,
        dto: CreateCourseDto,
    ) -> Result<u64, AppError> {
        let unit = WriteUnit::single("course", &["course_name"], vec![dto.course_name.into()]);
        Ok(TransactionContext::apply(source, &[unit]).await?)
    }

    #[instrument(skip(db))]
    pub async fn list_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        sqlx::query_as::<_, Course>("SELECT course_id, course_name FROM course ORDER BY course_name")
            .fetch_all(db)
            .await
            .map_err(read_error)
    }
}
