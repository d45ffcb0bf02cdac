mod common;

use axum::http::{Method, StatusCode};
use campussync_db::SqlParam;
use common::{
    ADMIN, ASSIGNMENT_ID, COURSE_ID, FACULTY, FACULTY_ID, OTHER_STUDENT_ID, STUDENT, STUDENT_ID,
    SUBJECT_ID, credentials, login_as, perform, seeded_source, send, setup_test_app,
    setup_test_app_with,
};
use serde_json::json;

fn subject_payload() -> serde_json::Value {
    json!({
        "subject_name": "Operating Systems",
        "course_id": COURSE_ID,
        "faculty_id": FACULTY_ID,
    })
}

#[tokio::test]
async fn test_add_subject_as_admin_commits_one_row() {
    let app = setup_test_app();
    let token = login_as(&app.router, &ADMIN).await;

    let (status, body) = perform(&app.router, Some(&token), "addSubject", subject_payload()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["action"], "addSubject");
    assert_eq!(body["affected"], 1);

    let rows = app.db.rows("subject");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], SqlParam::Text("Operating Systems".into()));
    assert_eq!(rows[0][1], SqlParam::Int(COURSE_ID));
    assert_eq!(rows[0][2], SqlParam::Int(FACULTY_ID));
}

#[tokio::test]
async fn test_add_subject_as_faculty_is_forbidden_and_writes_nothing() {
    let app = setup_test_app();
    let token = login_as(&app.router, &FACULTY).await;

    let (status, body) = perform(&app.router, Some(&token), "addSubject", subject_payload()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");
    assert!(app.db.rows("subject").is_empty());
    assert_eq!(app.db.acquisitions(), 0);
}

#[tokio::test]
async fn test_action_without_session_is_unauthorized() {
    let app = setup_test_app();

    let (status, body) = perform(&app.router, None, "addSubject", subject_payload()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
    assert_eq!(app.db.acquisitions(), 0);
}

#[tokio::test]
async fn test_unknown_action_is_not_found_only_with_a_session() {
    let app = setup_test_app();

    let (status, _) = perform(&app.router, None, "dropTables", json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login_as(&app.router, &ADMIN).await;
    let (status, body) = perform(&app.router, Some(&token), "dropTables", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown action");

    // Action names are case-sensitive
    let (status, _) = perform(&app.router, Some(&token), "AddSubject", subject_payload()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_is_checked_before_payload_is_parsed() {
    let app = setup_test_app();
    let token = login_as(&app.router, &STUDENT).await;

    let (status, _) = perform(&app.router, Some(&token), "addCourse", json!("garbage")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let app = setup_test_app();
    let token = login_as(&app.router, &ADMIN).await;

    let (status, body) = perform(
        &app.router,
        Some(&token),
        "addSubject",
        json!({ "subject_name": "Networks", "course_id": COURSE_ID }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "faculty_id is required");
    assert_eq!(app.db.acquisitions(), 0);
}

#[tokio::test]
async fn test_add_subject_with_unknown_course_conflicts_and_writes_nothing() {
    let app = setup_test_app();
    let token = login_as(&app.router, &ADMIN).await;

    let (status, _) = perform(
        &app.router,
        Some(&token),
        "addSubject",
        json!({ "subject_name": "Orphan", "course_id": 999, "faculty_id": FACULTY_ID }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(app.db.rows("subject").is_empty());
}

#[tokio::test]
async fn test_save_attendance_records_every_present_student() {
    let app = setup_test_app();
    let token = login_as(&app.router, &FACULTY).await;

    let (status, body) = perform(
        &app.router,
        Some(&token),
        "saveAttendance",
        json!({
            "subject_id": SUBJECT_ID,
            "date": "2024-03-01",
            "present": [STUDENT_ID, OTHER_STUDENT_ID, 9],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["affected"], 3);

    let rows = app.db.rows("attendance");
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.contains(&SqlParam::Text("P".into()))));
}

#[tokio::test]
async fn test_corrected_attendance_submission_adds_late_students() {
    let app = setup_test_app();
    let token = login_as(&app.router, &FACULTY).await;

    let (status, _) = perform(
        &app.router,
        Some(&token),
        "saveAttendance",
        json!({ "subject_id": SUBJECT_ID, "date": "2024-03-01", "present": [STUDENT_ID] }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = perform(
        &app.router,
        Some(&token),
        "saveAttendance",
        json!({
            "subject_id": SUBJECT_ID,
            "date": "2024-03-01",
            "present": [STUDENT_ID, OTHER_STUDENT_ID],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["affected"], 1);
    assert_eq!(app.db.rows("attendance").len(), 2);
}

#[tokio::test]
async fn test_save_attendance_with_no_one_present_touches_nothing() {
    let app = setup_test_app();
    let token = login_as(&app.router, &FACULTY).await;

    let (status, body) = perform(
        &app.router,
        Some(&token),
        "saveAttendance",
        json!({ "subject_id": SUBJECT_ID, "date": "2024-03-01", "present": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["affected"], 0);
    assert_eq!(app.db.acquisitions(), 0);
}

#[tokio::test]
async fn test_save_attendance_with_one_bad_student_writes_no_rows() {
    let app = setup_test_app();
    let token = login_as(&app.router, &FACULTY).await;

    let (status, body) = perform(
        &app.router,
        Some(&token),
        "saveAttendance",
        json!({
            "subject_id": SUBJECT_ID,
            "date": "2024-03-01",
            "present": [STUDENT_ID, 404, OTHER_STUDENT_ID],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Operation failed; no changes were applied");
    assert!(app.db.rows("attendance").is_empty());
    assert_eq!(app.db.releases(), 1);
}

#[tokio::test]
async fn test_write_during_outage_is_unavailable() {
    let app = setup_test_app_with(seeded_source().failing_acquire(), credentials());
    let token = login_as(&app.router, &ADMIN).await;

    let (status, _) = perform(
        &app.router,
        Some(&token),
        "addCourse",
        json!({ "course_name": "BSc Physics" }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_failed_commit_reports_unavailable_and_keeps_nothing() {
    let app = setup_test_app_with(seeded_source().failing_commit(), credentials());
    let token = login_as(&app.router, &ADMIN).await;

    let (status, _) = perform(
        &app.router,
        Some(&token),
        "saveNotice",
        json!({ "title": "Exams", "message": "Start on Monday" }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(app.db.rows("notice").is_empty());
}

#[tokio::test]
async fn test_enter_marks_out_of_range_fails_validation() {
    let app = setup_test_app();
    let token = login_as(&app.router, &FACULTY).await;

    let (status, _) = perform(
        &app.router,
        Some(&token),
        "enterMarks",
        json!({ "student_id": STUDENT_ID, "subject_id": SUBJECT_ID, "marks": 101 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.db.rows("marks").is_empty());
}

#[tokio::test]
async fn test_enter_marks_as_faculty() {
    let app = setup_test_app();
    let token = login_as(&app.router, &FACULTY).await;

    let (status, body) = perform(
        &app.router,
        Some(&token),
        "enterMarks",
        json!({ "student_id": STUDENT_ID, "subject_id": SUBJECT_ID, "marks": 88 }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["affected"], 1);
    assert_eq!(app.db.rows("marks").len(), 1);
}

#[tokio::test]
async fn test_submit_assignment_stores_document_under_student() {
    let app = setup_test_app();
    let token = login_as(&app.router, &STUDENT).await;

    let (status, _) = perform(
        &app.router,
        Some(&token),
        "submitAssignmentFile",
        json!({
            "assignment_id": ASSIGNMENT_ID,
            "file": { "file_name": "essay.txt", "content_base64": "aGVsbG8=" },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);

    let rows = app.db.rows("assignment_submission");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], SqlParam::Int(ASSIGNMENT_ID));
    assert_eq!(rows[0][1], SqlParam::Int(STUDENT_ID));

    let SqlParam::Text(key) = &rows[0][2] else {
        panic!("file path should be text, got {:?}", rows[0][2]);
    };
    assert!(key.starts_with(&format!("submissions/{}/{}/", ASSIGNMENT_ID, STUDENT_ID)));
    assert_eq!(
        std::fs::read(app.uploads.path().join(key)).unwrap(),
        b"hello"
    );
}

#[tokio::test]
async fn test_submit_to_unknown_assignment_leaves_no_file_behind() {
    let app = setup_test_app();
    let token = login_as(&app.router, &STUDENT).await;

    let (status, _) = perform(
        &app.router,
        Some(&token),
        "submitAssignmentFile",
        json!({
            "assignment_id": 999,
            "file": { "file_name": "essay.txt", "content_base64": "aGVsbG8=" },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    let submissions = app
        .uploads
        .path()
        .join(format!("submissions/999/{}", STUDENT_ID));
    let leftover = std::fs::read_dir(&submissions)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftover, 0);
}

#[tokio::test]
async fn test_student_reading_another_students_records_is_forbidden() {
    let app = setup_test_app();
    let token = login_as(&app.router, &STUDENT).await;

    for path in ["attendance", "attendance/summary", "marks"] {
        let uri = format!("/api/students/{}/{}", OTHER_STUDENT_ID, path);
        let (status, _) = send(&app.router, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
    }
}

#[tokio::test]
async fn test_failed_read_is_an_error_not_an_empty_list() {
    let app = setup_test_app();
    let token = login_as(&app.router, &STUDENT).await;

    // Own records pass authorization; the read pool is unreachable
    let uri = format!("/api/students/{}/marks", STUDENT_ID);
    let (status, body) = send(&app.router, Method::GET, &uri, Some(&token), None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(!body.is_array());
}

#[tokio::test]
async fn test_student_list_requires_admin() {
    let app = setup_test_app();
    let token = login_as(&app.router, &FACULTY).await;

    let (status, _) = send(&app.router, Method::GET, "/api/students", Some(&token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
