//! Attendance batches and the per-student attendance views.
//!
//! A submission names the students who were present for one subject on one
//! date. Every named student gets a `'P'` row; nobody else gets a row, and
//! the summary counts a held class without a row as an absence.
//!
//! Resubmitting a session adds the students missing from it; students
//! already marked present keep their existing row.

use std::collections::HashSet;
use std::sync::Arc;

use campussync_core::{AppError, CoreError};
use campussync_db::{ConnectionSource, TransactionContext, WriteUnit};
use campussync_models::ids::{StudentId, SubjectId};
use campussync_models::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use crate::db::read_error;
use crate::metrics::track_attendance_rows;

const ATTENDANCE_COLUMNS: &[&str] = &["student_id", "subject_id", "att_date", "status"];
const ATTENDANCE_KEY: &[&str] = &["student_id", "subject_id", "att_date"];

/// Rows per INSERT statement when writing a batch.
pub const ATTENDANCE_CHUNK_ROWS: usize = 500;

pub struct AttendanceService;

impl AttendanceService {
    /// Writes one present row per distinct student, all or nothing, and
    /// returns how many students were newly marked present.
    ///
    /// An empty submission returns 0 without touching the database.
    pub async fn record_attendance(
        source: Arc<dyn ConnectionSource>,
        subject_id: SubjectId,
        date: NaiveDate,
        present: &[StudentId],
    ) -> Result<u64, CoreError> {
        Self::record_attendance_chunked(source, subject_id, date, present, ATTENDANCE_CHUNK_ROWS)
            .await
    }

    #[instrument(skip(source, present), fields(submitted = present.len()))]
    pub async fn record_attendance_chunked(
        source: Arc<dyn ConnectionSource>,
        subject_id: SubjectId,
        date: NaiveDate,
        present: &[StudentId],
        chunk_rows: usize,
    ) -> Result<u64, CoreError> {
        let batch = Self::build_batch(subject_id, date, present);
        if batch.is_empty() {
            tracing::debug!("Empty attendance submission, nothing to write");
            return Ok(0);
        }

        let units = batch.split(chunk_rows);
        let written = TransactionContext::apply(source, &units).await?;

        track_attendance_rows(written);
        tracing::info!(rows = written, chunks = units.len(), "Attendance recorded");
        Ok(written)
    }

    fn build_batch(subject_id: SubjectId, date: NaiveDate, present: &[StudentId]) -> WriteUnit {
        let mut seen = HashSet::with_capacity(present.len());
        let mut batch =
            WriteUnit::new("attendance", ATTENDANCE_COLUMNS).skip_conflicts_on(ATTENDANCE_KEY);

        for student_id in present.iter().copied().filter(|id| seen.insert(*id)) {
            batch.push(vec![
                student_id.into_inner().into(),
                subject_id.into_inner().into(),
                date.into(),
                AttendanceStatus::Present.code().into(),
            ]);
        }

        batch
    }

    #[instrument(skip(db))]
    pub async fn list_for_student(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"SELECT s.subject_name, a.att_date, a.status
               FROM attendance a
               JOIN subject s ON s.subject_id = a.subject_id
               WHERE a.student_id = $1
               ORDER BY a.att_date DESC"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(read_error)
    }

    /// Per-subject attendance for the subjects of the student's course.
    ///
    /// A class is held on a date if anyone's attendance was taken for that
    /// subject on that date.
    #[instrument(skip(db))]
    pub async fn summary_for_student(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<Vec<AttendanceSummary>, AppError> {
        let rows = sqlx::query_as::<_, (SubjectId, String, i64, i64)>(
            r#"SELECT s.subject_id,
                      s.subject_name,
                      COUNT(DISTINCT a.att_date)
                          FILTER (WHERE a.student_id = $1 AND a.status = 'P') AS attended,
                      COUNT(DISTINCT a.att_date) AS held
               FROM student st
               JOIN course c ON c.course_name = st.course
               JOIN subject s ON s.course_id = c.course_id
               LEFT JOIN attendance a ON a.subject_id = s.subject_id
               WHERE st.student_id = $1
               GROUP BY s.subject_id, s.subject_name
               ORDER BY s.subject_name"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .map_err(read_error)?;

        Ok(rows
            .into_iter()
            .map(|(subject_id, subject_name, attended, held)| AttendanceSummary {
                subject_id,
                subject_name,
                attended,
                held,
                percentage: AttendanceSummary::percentage_of(attended, held),
            })
            .collect())
    }
}
