//! Fake data generation. Pure; nothing here touches the database.

use campussync_models::ids::{CourseId, FacultyId};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;

use super::models::{FacultySeed, StudentSeed, SubjectSeed};
use super::{SEED_COURSE_PREFIX, SEED_EMAIL_DOMAIN};

const FIELDS: &[&str] = &[
    "Computer Science",
    "Mechanical Engineering",
    "Commerce",
    "Mathematics",
    "Electronics",
    "Biotechnology",
];

const DEPARTMENTS: &[&str] = &["Computing", "Engineering", "Business", "Sciences"];

const SUBJECT_TOPICS: &[&str] = &[
    "Foundations",
    "Data Structures",
    "Statistics",
    "Systems",
    "Ethics",
    "Design",
    "Research Methods",
];

/// Course names carry [`SEED_COURSE_PREFIX`] so `clear` can find them.
pub fn generate_courses(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "{}{} {}",
                SEED_COURSE_PREFIX,
                FIELDS[i % FIELDS.len()],
                i / FIELDS.len() + 1
            )
        })
        .collect()
}

pub fn generate_faculty(count: usize) -> Vec<FacultySeed> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let (name, email) = fake_person("faculty", i);
            FacultySeed {
                name,
                email,
                department: DEPARTMENTS[i % DEPARTMENTS.len()].to_string(),
            }
        })
        .collect()
}

pub fn generate_students(courses: &[String], per_course: usize) -> Vec<StudentSeed> {
    courses
        .par_iter()
        .enumerate()
        .flat_map(|(course_idx, course)| {
            (0..per_course)
                .map(|student_idx| {
                    let (name, email) = fake_person("student", course_idx * 10_000 + student_idx);
                    StudentSeed {
                        name,
                        email,
                        course: course.clone(),
                        semester: (student_idx % 8) as i32 + 1,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Subjects per course, taught by faculty in round-robin order.
pub fn generate_subjects(
    course_ids: &[CourseId],
    faculty_ids: &[FacultyId],
    per_course: usize,
) -> Vec<SubjectSeed> {
    if faculty_ids.is_empty() {
        return Vec::new();
    }

    course_ids
        .iter()
        .enumerate()
        .flat_map(|(course_idx, &course_id)| {
            (0..per_course).map(move |subject_idx| {
                let n = course_idx * per_course + subject_idx;
                SubjectSeed {
                    subject_name: format!(
                        "{} {}",
                        SUBJECT_TOPICS[subject_idx % SUBJECT_TOPICS.len()],
                        subject_idx / SUBJECT_TOPICS.len() + 1
                    ),
                    course_id,
                    faculty_id: faculty_ids[n % faculty_ids.len()],
                }
            })
        })
        .collect()
}

fn fake_person(kind: &str, n: usize) -> (String, String) {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();

    let local: String = format!("{}.{}", first, last)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();
    let email = format!("{}+{}{}@{}", local, kind, n, SEED_EMAIL_DOMAIN);

    (format!("{} {}", first, last), email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_course_names_are_prefixed_and_unique() {
        let courses = generate_courses(8);
        assert_eq!(courses.len(), 8);
        assert!(courses.iter().all(|c| c.starts_with(SEED_COURSE_PREFIX)));
        assert_eq!(courses.iter().collect::<HashSet<_>>().len(), 8);
    }

    #[test]
    fn test_student_emails_unique_across_courses() {
        let courses = generate_courses(3);
        let students = generate_students(&courses, 50);

        assert_eq!(students.len(), 150);
        let emails: HashSet<_> = students.iter().map(|s| s.email.as_str()).collect();
        assert_eq!(emails.len(), 150);
        assert!(students.iter().all(|s| (1..=8).contains(&s.semester)));
        assert!(students.iter().all(|s| s.email.ends_with(SEED_EMAIL_DOMAIN)));
    }

    #[test]
    fn test_subjects_round_robin_faculty() {
        let subjects = generate_subjects(
            &[CourseId(1), CourseId(2)],
            &[FacultyId(10), FacultyId(11), FacultyId(12)],
            2,
        );

        let faculty: Vec<i32> = subjects.iter().map(|s| s.faculty_id.into_inner()).collect();
        assert_eq!(faculty, vec![10, 11, 12, 10]);
        assert_eq!(subjects[2].course_id, CourseId(2));
    }

    #[test]
    fn test_no_subjects_without_faculty() {
        assert!(generate_subjects(&[CourseId(1)], &[], 3).is_empty());
    }
}
