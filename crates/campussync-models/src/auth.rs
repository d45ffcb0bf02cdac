//! Login and session payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::roles::Role;

/// Credential triple presented at login.
///
/// `identifier` is an email for students and faculty and a username for
/// admins. `role` stays a plain string so that an unknown role is rejected
/// by the verifier with the same response as a wrong secret.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "stu1@campus.edu")]
    pub identifier: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub secret: String,
    #[schema(example = "student")]
    pub role: String,
}

/// Who the current session acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityResponse {
    pub role: Role,
    pub id: i32,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Opaque session token; send as `Authorization: Bearer <token>`.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub identity: IdentityResponse,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
