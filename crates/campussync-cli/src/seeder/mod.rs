//! Database seeding.
//!
//! Generation is done in parallel up front; each table is then inserted in
//! one transaction. Seeded people use [`SEED_EMAIL_DOMAIN`] and seeded
//! courses [`SEED_COURSE_PREFIX`], which is how [`clear_all`] finds them.

pub mod generate;
pub mod models;

use std::sync::Arc;
use std::time::Instant;

use campussync_db::{ConnectionSource, PgConnectionSource, TransactionContext, WriteUnit};
use campussync_models::ids::{CourseId, FacultyId};
use sqlx::PgPool;

pub use models::SeedConfig;

pub const SEED_EMAIL_DOMAIN: &str = "seed.campussync.test";
pub const SEED_COURSE_PREFIX: &str = "Seed ";

const SEED_CHUNK_ROWS: usize = 1000;

type SeedResult<T> = Result<T, Box<dyn std::error::Error>>;

pub async fn seed_all(db: &PgPool, config: SeedConfig, password_hash: &str) -> SeedResult<()> {
    let start_time = Instant::now();
    let source: Arc<dyn ConnectionSource> = Arc::new(PgConnectionSource::new(db.clone()));

    println!("🌱 Seeding campus data...");

    let courses = generate::generate_courses(config.courses);
    let mut unit = WriteUnit::new("course", &["course_name"]);
    for course in &courses {
        unit.push(vec![course.as_str().into()]);
    }
    let written = insert(&source, unit).await?;
    println!("   ✓ {} courses", written);

    let faculty = generate::generate_faculty(config.faculty);
    let mut unit = WriteUnit::new("faculty", &["name", "email", "password", "department"]);
    for seed in faculty {
        unit.push(vec![
            seed.name.into(),
            seed.email.into(),
            password_hash.into(),
            seed.department.into(),
        ]);
    }
    let written = insert(&source, unit).await?;
    println!("   ✓ {} faculty", written);

    let students = generate::generate_students(&courses, config.students_per_course);
    let mut unit = WriteUnit::new(
        "student",
        &["name", "email", "password", "course", "semester"],
    );
    for seed in students {
        unit.push(vec![
            seed.name.into(),
            seed.email.into(),
            password_hash.into(),
            seed.course.into(),
            seed.semester.into(),
        ]);
    }
    let written = insert(&source, unit).await?;
    println!("   ✓ {} students", written);

    let course_ids = sqlx::query_scalar::<_, CourseId>(
        "SELECT course_id FROM course WHERE course_name LIKE $1 ORDER BY course_id",
    )
    .bind(format!("{}%", SEED_COURSE_PREFIX))
    .fetch_all(db)
    .await?;
    let faculty_ids = sqlx::query_scalar::<_, FacultyId>(
        "SELECT faculty_id FROM faculty WHERE email LIKE $1 ORDER BY faculty_id",
    )
    .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
    .fetch_all(db)
    .await?;

    let subjects =
        generate::generate_subjects(&course_ids, &faculty_ids, config.subjects_per_course);
    let mut unit = WriteUnit::new("subject", &["subject_name", "course_id", "faculty_id"]);
    for seed in subjects {
        unit.push(vec![
            seed.subject_name.into(),
            seed.course_id.into_inner().into(),
            seed.faculty_id.into_inner().into(),
        ]);
    }
    let written = insert(&source, unit).await?;
    println!("   ✓ {} subjects", written);

    println!("✅ Seeding finished in {:?}", start_time.elapsed());
    Ok(())
}

async fn insert(source: &Arc<dyn ConnectionSource>, unit: WriteUnit) -> SeedResult<u64> {
    if unit.is_empty() {
        return Ok(0);
    }
    let chunks = unit.split(SEED_CHUNK_ROWS);
    Ok(TransactionContext::apply(Arc::clone(source), &chunks).await?)
}

/// Removes every seeded row. Rows created through the API are kept.
pub async fn clear_all(db: &PgPool) -> SeedResult<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let email_pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let course_pattern = format!("{}%", SEED_COURSE_PREFIX);
    // Pattern deletes have no WriteUnit form, so this maintenance path uses
    // a plain sqlx transaction. It still clears everything or nothing.
    let mut tx = db.begin().await?;
    let mut deleted = 0;

    deleted += sqlx::query(
        r#"DELETE FROM assignment
           WHERE faculty_id IN (SELECT faculty_id FROM faculty WHERE email LIKE $1)"#,
    )
    .bind(&email_pattern)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    deleted += sqlx::query(
        r#"DELETE FROM subject
           WHERE faculty_id IN (SELECT faculty_id FROM faculty WHERE email LIKE $1)
              OR course_id IN (SELECT course_id FROM course WHERE course_name LIKE $2)"#,
    )
    .bind(&email_pattern)
    .bind(&course_pattern)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    for table in ["student", "faculty"] {
        deleted += sqlx::query(&format!("DELETE FROM {} WHERE email LIKE $1", table))
            .bind(&email_pattern)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    deleted += sqlx::query("DELETE FROM course WHERE course_name LIKE $1")
        .bind(&course_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!("   ✓ Deleted {} rows in {:?}", deleted, start_time.elapsed());
    Ok(deleted)
}
