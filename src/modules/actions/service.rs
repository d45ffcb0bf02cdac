//! Dispatch of role-routed write actions.
//!
//! The caller has already been authorized for `action` by the time
//! [`ActionService::dispatch`] runs; the payload is parsed and validated
//! only then, so an unauthorized caller cannot probe payload validation.

use campussync_auth::{Action, Identity};
use campussync_core::AppError;
use campussync_models::{
    CreateCourseDto, CreateFacultyDto, CreateNoticeDto, CreateStudentDto, CreateSubjectDto,
    EnterMarksDto, SaveAttendanceDto, SubmitAssignmentDto, UploadAssignmentDto,
};
use tracing::instrument;

use crate::modules::assignments::service::AssignmentService;
use crate::modules::attendance::service::AttendanceService;
use crate::modules::courses::service::CourseService;
use crate::modules::faculty::service::FacultyService;
use crate::modules::marks::service::MarksService;
use crate::modules::notices::service::NoticeService;
use crate::modules::students::service::StudentService;
use crate::modules::subjects::service::SubjectService;
use crate::state::AppState;
use crate::validator::parse_payload;

const NO_PARTIAL_EFFECT: &str = "Operation failed; no changes were applied";

pub struct ActionService;

impl ActionService {
    /// Runs `action` for `actor` and returns the rows it wrote.
    #[instrument(skip(state, actor, body), fields(identity_id = actor.id()))]
    pub async fn dispatch(
        state: &AppState,
        action: Action,
        actor: &Identity,
        body: &[u8],
    ) -> Result<u64, AppError> {
        let source = state.tx_source.clone();

        match action {
            Action::AddStudent => {
                let dto: CreateStudentDto = parse_payload(body)?;
                StudentService::create_student(source, &state.secrets, dto).await
            }
            Action::AddFaculty => {
                let dto: CreateFacultyDto = parse_payload(body)?;
                FacultyService::create_faculty(source, &state.secrets, dto).await
            }
            Action::AddCourse => {
                let dto: CreateCourseDto = parse_payload(body)?;
                CourseService::create_course(source, dto).await
            }
            Action::AddSubject => {
                let dto: CreateSubjectDto = parse_payload(body)?;
                if SubjectService::create_subject(source, dto).await? {
                    Ok(1)
                } else {
                    Err(AppError::internal(anyhow::anyhow!(NO_PARTIAL_EFFECT)))
                }
            }
            Action::SaveNotice => {
                let dto: CreateNoticeDto = parse_payload(body)?;
                NoticeService::create_notice(source, dto).await
            }
            Action::SaveAttendance => {
                let dto: SaveAttendanceDto = parse_payload(body)?;
                Ok(
                    AttendanceService::record_attendance(source, dto.subject_id, dto.date, &dto.present)
                        .await?,
                )
            }
            Action::EnterMarks => {
                let dto: EnterMarksDto = parse_payload(body)?;
                MarksService::enter_marks(source, dto).await
            }
            Action::UploadAssignment => {
                let dto: UploadAssignmentDto = parse_payload(body)?;
                AssignmentService::upload_assignment(source, state.storage.as_ref(), actor.id(), dto)
                    .await
            }
            Action::SubmitAssignmentFile => {
                let dto: SubmitAssignmentDto = parse_payload(body)?;
                AssignmentService::submit_assignment(source, state.storage.as_ref(), actor.id(), dto)
                    .await
            }
        }
    }
}
