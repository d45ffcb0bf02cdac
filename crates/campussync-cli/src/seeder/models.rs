//! Seed data shapes and seeding configuration.

use campussync_models::ids::{CourseId, FacultyId};

pub struct FacultySeed {
    pub name: String,
    pub email: String,
    pub department: String,
}

pub struct StudentSeed {
    pub name: String,
    pub email: String,
    pub course: String,
    pub semester: i32,
}

pub struct SubjectSeed {
    pub subject_name: String,
    pub course_id: CourseId,
    pub faculty_id: FacultyId,
}

/// How much to generate.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub courses: usize,
    pub faculty: usize,
    pub students_per_course: usize,
    pub subjects_per_course: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            courses: 4,
            faculty: 10,
            students_per_course: 30,
            subjects_per_course: 5,
        }
    }
}

impl SeedConfig {
    pub fn total_students(&self) -> usize {
        self.courses * self.students_per_course
    }

    pub fn total_subjects(&self) -> usize {
        self.courses * self.subjects_per_course
    }
}
