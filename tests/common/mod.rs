use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use campussync::router::init_router;
use campussync::state::AppState;
use campussync_auth::{CredentialVerifier, InMemorySessionStore, MemoryCredentialStore};
use campussync_config::{CorsConfig, RateLimitConfig};
use campussync_core::{LocalFileStorage, PlaintextSecrets};
use campussync_db::MemorySource;
use campussync_models::Role;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_ID: i32 = 1;
pub const FACULTY_ID: i32 = 5;
pub const STUDENT_ID: i32 = 7;
pub const OTHER_STUDENT_ID: i32 = 8;
pub const COURSE_ID: i32 = 3;
pub const SUBJECT_ID: i32 = 12;
pub const ASSIGNMENT_ID: i32 = 40;

#[allow(dead_code)]
pub struct TestUser {
    pub role: Role,
    pub identifier: &'static str,
    pub secret: &'static str,
}

#[allow(dead_code)]
pub const ADMIN: TestUser = TestUser {
    role: Role::Admin,
    identifier: "admin",
    secret: "admin-secret",
};

#[allow(dead_code)]
pub const FACULTY: TestUser = TestUser {
    role: Role::Faculty,
    identifier: "smith@campus.test",
    secret: "faculty-secret",
};

#[allow(dead_code)]
pub const STUDENT: TestUser = TestUser {
    role: Role::Student,
    identifier: "alice@campus.test",
    secret: "student-secret",
};

/// A router wired to in-memory collaborators.
///
/// `db` is the write side: every action goes through it and its committed
/// rows can be inspected. The read pool points at nothing, so read endpoints
/// answer 503 once they get past authorization.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub db: MemorySource,
    pub uploads: TempDir,
}

/// Write-side database with the foreign keys the fixtures rely on.
pub fn seeded_source() -> MemorySource {
    MemorySource::new()
        .with_reference("subject", "course_id", [COURSE_ID])
        .with_reference("subject", "faculty_id", [FACULTY_ID])
        .with_reference("attendance", "subject_id", [SUBJECT_ID])
        .with_reference("attendance", "student_id", [STUDENT_ID, OTHER_STUDENT_ID, 9, 10])
        .with_reference("marks", "subject_id", [SUBJECT_ID])
        .with_reference("marks", "student_id", [STUDENT_ID, OTHER_STUDENT_ID])
        .with_reference("assignment_submission", "assignment_id", [ASSIGNMENT_ID])
}

pub fn credentials() -> MemoryCredentialStore {
    MemoryCredentialStore::new()
        .with(Role::Admin, ADMIN.identifier, ADMIN_ID, "Campus Admin", ADMIN.secret)
        .with(Role::Faculty, FACULTY.identifier, FACULTY_ID, "Dr Smith", FACULTY.secret)
        .with(Role::Student, STUDENT.identifier, STUDENT_ID, "Alice", STUDENT.secret)
        .with(
            Role::Student,
            "bob@campus.test",
            OTHER_STUDENT_ID,
            "Bob",
            "bob-secret",
        )
}

#[allow(dead_code)]
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(seeded_source(), credentials())
}

#[allow(dead_code)]
pub fn setup_test_app_with(db: MemorySource, credentials: MemoryCredentialStore) -> TestApp {
    let (state, uploads) = test_state(db.clone(), credentials);

    TestApp {
        router: init_router(state),
        db,
        uploads,
    }
}

/// State over in-memory collaborators. The returned directory holds uploads
/// and must outlive the router.
#[allow(dead_code)]
pub fn test_state(db: MemorySource, credentials: MemoryCredentialStore) -> (AppState, TempDir) {
    let uploads = tempfile::tempdir().unwrap();

    // Nothing listens on port 1; reads fail fast instead of hanging
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://campussync@127.0.0.1:1/campussync_test")
        .unwrap();

    let state = AppState {
        db: pool,
        tx_source: Arc::new(db),
        verifier: CredentialVerifier::new(Arc::new(credentials), Arc::new(PlaintextSecrets)),
        sessions: Arc::new(InMemorySessionStore::new(Duration::from_secs(3600))),
        secrets: Arc::new(PlaintextSecrets),
        storage: Arc::new(LocalFileStorage::new(
            uploads.path().to_path_buf(),
            "/files".to_string(),
        )),
        cors_config: CorsConfig {
            allowed_origins: vec![],
        },
        rate_limit_config: RateLimitConfig::default(),
    };

    (state, uploads)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Logs in as `user` and returns the bearer token.
#[allow(dead_code)]
pub async fn login_as(app: &Router, user: &TestUser) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({
            "identifier": user.identifier,
            "secret": user.secret,
            "role": user.role.as_str(),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn perform(
    app: &Router,
    token: Option<&str>,
    action: &str,
    payload: Value,
) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/api/actions/{}", action),
        token,
        Some(payload),
    )
    .await
}
