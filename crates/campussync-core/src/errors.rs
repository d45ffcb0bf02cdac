//! Error taxonomy for the transactional/authorization core.
//!
//! Three families of typed failures flow out of the core:
//!
//! - [`AuthFailure`]: credential and authorization denials
//! - [`TransactionError`]: lifecycle misuse of a transaction context
//! - [`WriteError`]: failures reported by the underlying store
//!
//! [`CoreError`] unifies them so a handler can `?` through any layer, and
//! [`AppError`] is what finally crosses the HTTP boundary. The conversion
//! deliberately collapses detail: credential failures never reveal which of
//! identifier, secret or role was wrong, and write failures only ever say that
//! nothing was applied.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use utoipa::ToSchema;

/// Reasons an authentication or authorization check can deny a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum AuthFailure {
    #[error("claimed role is not a known role")]
    InvalidRole,
    #[error("no credential matched")]
    NoMatch,
    #[error("no session presented")]
    NoSession,
    #[error("session role does not match the required role")]
    RoleMismatch,
    #[error("unknown action")]
    UnknownAction,
    #[error("record belongs to another identity")]
    NotOwner,
}

impl AuthFailure {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRole => "invalid_role",
            Self::NoMatch => "no_match",
            Self::NoSession => "no_session",
            Self::RoleMismatch => "role_mismatch",
            Self::UnknownAction => "unknown_action",
            Self::NotOwner => "not_owner",
        }
    }
}

/// Lifecycle violations of a transaction context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum TransactionError {
    #[error("transaction already active")]
    AlreadyActive,
    #[error("no active transaction")]
    NotActive,
    #[error("transaction context is closed")]
    InactiveTransaction,
}

/// Failures reported by the storage engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// A constraint (foreign key, unique, check, not-null) rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// The store could not be reached or the connection broke mid-operation.
    #[error("connectivity failure: {0}")]
    ConnectivityFailure(String),
}

/// Any failure the core can surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Auth(#[from] AuthFailure),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

impl CoreError {
    pub fn as_auth(&self) -> Option<AuthFailure> {
        match self {
            Self::Auth(failure) => Some(*failure),
            _ => None,
        }
    }
}

const NO_PARTIAL_EFFECT: &str = "Operation failed; no changes were applied";

/// Body shape of every error response.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message.to_string()))
    }

    pub fn forbidden(message: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message.to_string()))
    }

    pub fn unavailable(message: &str) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            anyhow::anyhow!(message.to_string()),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = %self.error, "Request failed");
        }

        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        match failure {
            AuthFailure::InvalidRole | AuthFailure::NoMatch => {
                Self::unauthorized("Invalid credentials")
            }
            AuthFailure::NoSession => Self::unauthorized("Authentication required"),
            AuthFailure::RoleMismatch | AuthFailure::NotOwner => Self::forbidden("Access denied"),
            AuthFailure::UnknownAction => Self::not_found(anyhow::anyhow!("Unknown action")),
        }
    }
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        tracing::error!(error = %err, "Transaction lifecycle violated");
        Self::internal(anyhow::anyhow!(NO_PARTIAL_EFFECT))
    }
}

impl From<WriteError> for AppError {
    fn from(err: WriteError) -> Self {
        let status = match &err {
            WriteError::ConstraintViolation(_) => StatusCode::CONFLICT,
            WriteError::ConnectivityFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        tracing::warn!(error = %err, "Write rejected by store");
        Self::new(status, anyhow::anyhow!(NO_PARTIAL_EFFECT))
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Auth(failure) => failure.into(),
            CoreError::Transaction(err) => err.into(),
            CoreError::Write(err) => err.into(),
        }
    }
}

impl From<crate::file_storage::StorageError> for AppError {
    fn from(err: crate::file_storage::StorageError) -> Self {
        use crate::file_storage::StorageError;

        match err {
            StorageError::TooLarge { .. } => Self::new(StatusCode::PAYLOAD_TOO_LARGE, err),
            StorageError::DisallowedExtension { .. } | StorageError::InvalidKey(_) => {
                Self::bad_request(err)
            }
            StorageError::Io(_) => Self::internal(err),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}
