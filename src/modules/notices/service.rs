use std::sync::Arc;

use campussync_core::AppError;
use campussync_db::{ConnectionSource, TransactionContext, WriteUnit};
use campussync_models::{CreateNoticeDto, Notice};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::read_error;

pub struct NoticeService;

impl NoticeService {
    /// `posted_at` is stamped by the database.
    #[instrument(skip(source, dto), fields(title = %dto.title))]
    pub async fn create_notice(
        source: Arc<dyn ConnectionSource>,
        dto: CreateNoticeDto,
    ) -> Result<u64, AppError> {
        let unit = WriteUnit::single(
            "notice",
            &["title", "message"],
            vec![dto.title.into(), dto.message.into()],
        );
        Ok(TransactionContext::apply(source, &[unit]).await?)
    }

    #[instrument(skip(db))]
    pub async fn list_notices(db: &PgPool) -> Result<Vec<Notice>, AppError> {
        sqlx::query_as::<_, Notice>(
            "SELECT notice_id, title, message, posted_at FROM notice ORDER BY posted_at DESC",
        )
        .fetch_all(db)
        .await
        .map_err(read_error)
    }
}
