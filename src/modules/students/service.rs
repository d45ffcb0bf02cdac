use std::sync::Arc;

use campussync_core::{AppError, SecretVerifier};
use campussync_db::{ConnectionSource, TransactionContext, WriteUnit};
use campussync_models::{CreateStudentDto, Student};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::read_error;
use crate::utils::password::hash_secret;

const STUDENT_COLUMNS: &[&str] = &["name", "email", "password", "course", "semester"];

pub struct StudentService;

impl StudentService {
    /// Inserts one student. The password is hashed before it leaves this function.
    #[instrument(skip(source, secrets, dto), fields(email = %dto.email))]
    pub async fn create_student(
        source: Arc<dyn ConnectionSource>,
        secrets: &Arc<dyn SecretVerifier>,
        dto: CreateStudentDto,
    ) -> Result<u64, AppError> {
        let stored = hash_secret(secrets, &dto.password).await?;

        let unit = WriteUnit::single(
            "student",
            STUDENT_COLUMNS,
            vec![
                dto.name.into(),
                dto.email.into(),
                stored.into(),
                dto.course.into(),
                dto.semester.into(),
            ],
        );

        Ok(TransactionContext::apply(source, &[unit]).await?)
    }

    #[instrument(skip(db))]
    pub async fn list_students(db: &PgPool) -> Result<Vec<Student>, AppError> {
        sqlx::query_as::<_, Student>(
            r#"SELECT student_id, name, email, course, semester, created_at
               FROM student
               ORDER BY student_id"#,
        )
        .fetch_all(db)
        .await
        .map_err(read_error)
    }
}
