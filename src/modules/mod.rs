pub mod actions;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod faculty;
pub mod marks;
pub mod notices;
pub mod students;
pub mod subjects;
