//! Action-to-role routing.
//!
//! Every write action has exactly one role allowed to perform it. The table
//! is fixed at compile time; an action name outside it is denied.
//!
//! Checks run in a fixed order: a missing session is reported before an
//! unknown action, so callers without a session learn nothing about which
//! action names exist.

use std::fmt;

use campussync_core::AuthFailure;
use campussync_models::Role;

use crate::identity::Identity;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    AddStudent,
    AddFaculty,
    AddCourse,
    AddSubject,
    SaveNotice,
    SaveAttendance,
    EnterMarks,
    UploadAssignment,
    SubmitAssignmentFile,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::AddStudent,
        Action::AddFaculty,
        Action::AddCourse,
        Action::AddSubject,
        Action::SaveNotice,
        Action::SaveAttendance,
        Action::EnterMarks,
        Action::UploadAssignment,
        Action::SubmitAssignmentFile,
    ];

    /// Resolves a wire action name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Result<Self, AuthFailure> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == name)
            .ok_or(AuthFailure::UnknownAction)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AddStudent => "addStudent",
            Self::AddFaculty => "addFaculty",
            Self::AddCourse => "addCourse",
            Self::AddSubject => "addSubject",
            Self::SaveNotice => "saveNotice",
            Self::SaveAttendance => "saveAttendance",
            Self::EnterMarks => "enterMarks",
            Self::UploadAssignment => "uploadAssignment",
            Self::SubmitAssignmentFile => "submitAssignmentFile",
        }
    }

    pub fn required_role(&self) -> Role {
        match self {
            Self::AddStudent
            | Self::AddFaculty
            | Self::AddCourse
            | Self::AddSubject
            | Self::SaveNotice => Role::Admin,
            Self::SaveAttendance | Self::EnterMarks | Self::UploadAssignment => Role::Faculty,
            Self::SubmitAssignmentFile => Role::Student,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the session's identity iff its role is `required`.
pub fn authorize(session: Option<&Session>, required: Role) -> Result<Identity, AuthFailure> {
    let session = session.ok_or(AuthFailure::NoSession)?;
    if session.identity.role() != required {
        return Err(AuthFailure::RoleMismatch);
    }
    Ok(session.identity.clone())
}

/// Resolves `action_name` and checks the session against its role.
pub fn authorize_action(
    session: Option<&Session>,
    action_name: &str,
) -> Result<(Action, Identity), AuthFailure> {
    if session.is_none() {
        return Err(AuthFailure::NoSession);
    }
    let action = Action::from_name(action_name)?;
    let identity = authorize(session, action.required_role())?;
    Ok((action, identity))
}

/// Gate for reads of one student's records.
///
/// Faculty and admins may read any student's records. A student may read
/// only their own; asking for another student's is denied, not filtered.
pub fn authorize_student_record(
    session: Option<&Session>,
    student_id: i32,
) -> Result<Identity, AuthFailure> {
    let session = session.ok_or(AuthFailure::NoSession)?;
    let identity = &session.identity;

    match identity.role() {
        Role::Faculty | Role::Admin => Ok(identity.clone()),
        Role::Student if identity.id() == student_id => Ok(identity.clone()),
        Role::Student => Err(AuthFailure::NotOwner),
    }
}
