//! Transaction behavior against a real PostgreSQL.
//!
//! Run with `DATABASE_URL` set and `cargo test -- --ignored`.

use std::sync::Arc;

use campussync::modules::attendance::AttendanceService;
use campussync::modules::subjects::service::SubjectService;
use campussync_core::CoreError;
use campussync_db::{ConnectionSource, PgConnectionSource, TransactionContext, TxState};
use campussync_models::{CourseId, FacultyId, StudentId, SubjectId};
use chrono::NaiveDate;
use sqlx::PgPool;

struct Fixture {
    course_id: CourseId,
    faculty_id: FacultyId,
    students: Vec<StudentId>,
}

async fn seed(pool: &PgPool) -> Fixture {
    let course_id: i32 =
        sqlx::query_scalar("INSERT INTO course (course_name) VALUES ('BSc CS') RETURNING course_id")
            .fetch_one(pool)
            .await
            .unwrap();

    let faculty_id: i32 = sqlx::query_scalar(
        r#"INSERT INTO faculty (name, email, password, department)
           VALUES ('Dr Smith', 'smith@campus.test', 'x', 'CS')
           RETURNING faculty_id"#,
    )
    .fetch_one(pool)
    .await
    .unwrap();

    let mut students = Vec::new();
    for n in 1..=3 {
        let id: i32 = sqlx::query_scalar(
            r#"INSERT INTO student (name, email, password, course, semester)
               VALUES ($1, $2, 'x', 'BSc CS', 1)
               RETURNING student_id"#,
        )
        .bind(format!("Student {}", n))
        .bind(format!("s{}@campus.test", n))
        .fetch_one(pool)
        .await
        .unwrap();
        students.push(StudentId(id));
    }

    Fixture {
        course_id: CourseId(course_id),
        faculty_id: FacultyId(faculty_id),
        students,
    }
}

fn source(pool: &PgPool) -> Arc<dyn ConnectionSource> {
    Arc::new(PgConnectionSource::new(pool.clone()))
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_committed_subject_is_visible(pool: PgPool) {
    let fixture = seed(&pool).await;

    let mut ctx = TransactionContext::new(source(&pool));
    ctx.begin().await.unwrap();
    let inserted = SubjectService::add_subject_transactional(
        &mut ctx,
        "Operating Systems",
        fixture.course_id,
        fixture.faculty_id,
    )
    .await
    .unwrap();
    assert!(inserted);
    ctx.commit().await.unwrap();
    ctx.close().await;

    assert_eq!(count(&pool, "subject").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_rolled_back_subject_is_never_visible(pool: PgPool) {
    let fixture = seed(&pool).await;

    let mut ctx = TransactionContext::new(source(&pool));
    ctx.begin().await.unwrap();
    SubjectService::add_subject_transactional(
        &mut ctx,
        "Compilers",
        fixture.course_id,
        fixture.faculty_id,
    )
    .await
    .unwrap();
    ctx.rollback().await.unwrap();
    assert_eq!(ctx.state(), TxState::RolledBack);
    ctx.close().await;

    assert_eq!(count(&pool, "subject").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_subject_with_unknown_faculty_is_a_constraint_violation(pool: PgPool) {
    let fixture = seed(&pool).await;

    let mut ctx = TransactionContext::new(source(&pool));
    ctx.begin().await.unwrap();
    let result =
        SubjectService::add_subject_transactional(&mut ctx, "Ghost", fixture.course_id, FacultyId(999_999))
            .await;

    assert!(matches!(
        result,
        Err(CoreError::Write(campussync_core::WriteError::ConstraintViolation(_)))
    ));
    assert_eq!(ctx.state(), TxState::RolledBack);
    ctx.close().await;
    assert_eq!(count(&pool, "subject").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_attendance_failure_in_a_later_chunk_keeps_nothing(pool: PgPool) {
    let fixture = seed(&pool).await;
    let mut ctx = TransactionContext::new(source(&pool));
    ctx.begin().await.unwrap();
    SubjectService::add_subject_transactional(&mut ctx, "Networks", fixture.course_id, fixture.faculty_id)
        .await
        .unwrap();
    ctx.commit().await.unwrap();
    ctx.close().await;

    let subject_id: i32 = sqlx::query_scalar("SELECT subject_id FROM subject")
        .fetch_one(&pool)
        .await
        .unwrap();

    let mut present = fixture.students.clone();
    present.push(StudentId(999_999));

    let result = AttendanceService::record_attendance_chunked(
        source(&pool),
        SubjectId(subject_id),
        date(),
        &present,
        2,
    )
    .await;

    assert!(result.is_err());
    assert_eq!(count(&pool, "attendance").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_attendance_summary_counts_held_classes(pool: PgPool) {
    let fixture = seed(&pool).await;
    let mut ctx = TransactionContext::new(source(&pool));
    ctx.begin().await.unwrap();
    SubjectService::add_subject_transactional(&mut ctx, "Databases", fixture.course_id, fixture.faculty_id)
        .await
        .unwrap();
    ctx.commit().await.unwrap();
    ctx.close().await;

    let subject_id: i32 = sqlx::query_scalar("SELECT subject_id FROM subject")
        .fetch_one(&pool)
        .await
        .unwrap();
    let subject_id = SubjectId(subject_id);
    let first = fixture.students[0];
    let second = fixture.students[1];

    let day_one = date();
    let day_two = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    AttendanceService::record_attendance(source(&pool), subject_id, day_one, &[first, second])
        .await
        .unwrap();
    AttendanceService::record_attendance(source(&pool), subject_id, day_two, &[second])
        .await
        .unwrap();

    let summary = AttendanceService::summary_for_student(&pool, first).await.unwrap();

    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].attended, 1);
    assert_eq!(summary[0].held, 2);
    assert!((summary[0].percentage - 50.0).abs() < f64::EPSILON);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_attendance_resubmission_adds_only_missing_students(pool: PgPool) {
    let fixture = seed(&pool).await;
    let mut ctx = TransactionContext::new(source(&pool));
    ctx.begin().await.unwrap();
    SubjectService::add_subject_transactional(&mut ctx, "Algorithms", fixture.course_id, fixture.faculty_id)
        .await
        .unwrap();
    ctx.commit().await.unwrap();
    ctx.close().await;

    let subject_id: i32 = sqlx::query_scalar("SELECT subject_id FROM subject")
        .fetch_one(&pool)
        .await
        .unwrap();
    let subject_id = SubjectId(subject_id);

    let first = AttendanceService::record_attendance(
        source(&pool),
        subject_id,
        date(),
        &fixture.students[..2],
    )
    .await
    .unwrap();
    let second =
        AttendanceService::record_attendance(source(&pool), subject_id, date(), &fixture.students)
            .await
            .unwrap();

    assert_eq!(first, 2);
    assert_eq!(second, 1);
    assert_eq!(count(&pool, "attendance").await, 3);
}
