use std::sync::Arc;

use campussync_core::{AppError, SecretVerifier};
use campussync_db::{ConnectionSource, TransactionContext, WriteUnit};
use campussync_models::{CreateFacultyDto, Faculty};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::read_error;
use crate::utils::password::hash_secret;

const FACULTY_COLUMNS: &[&str] = &["name", "email", "password", "department"];

pub struct FacultyService;

impl FacultyService {
    #[instrument(skip(source, secrets, dto), fields(email = %dto.email))]
    pub async fn create_faculty(
        source: Arc<dyn ConnectionSource>,
        secrets: &Arc<dyn SecretVerifier>,
        dto: CreateFacultyDto,
    ) -> Result<u64, AppError> {
        let stored = hash_secret(secrets, &dto.password).await?;

        let unit = WriteUnit::single(
            "faculty",
            FACULTY_COLUMNS,
            vec![
                dto.name.into(),
                dto.email.into(),
                stored.into(),
                dto.department.into(),
            ],
        );

        Ok(TransactionContext::apply(source, &[unit]).await?)
    }

    #[instrument(skip(db))]
    pub async fn list_faculty(db: &PgPool) -> Result<Vec<Faculty>, AppError> {
        sqlx::query_as::<_, Faculty>(
            "SELECT faculty_id, name, email, department FROM faculty ORDER BY name",
        )
        .fetch_all(db)
        .await
        .map_err(read_error)
    }
}
