//! Per-role credential lookup.

use campussync_core::{BoxFuture, WriteError};
use campussync_models::Role;
use sqlx::{FromRow, PgPool};

/// What the verifier needs from a credential row.
#[derive(Debug, Clone, FromRow)]
pub struct CredentialRecord {
    pub id: i32,
    pub display_name: String,
    pub stored_secret: String,
}

/// Looks up a credential in the store for exactly one role.
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` means no row has that identifier. Store outages are errors,
    /// never `None`.
    fn find<'a>(
        &'a self,
        role: Role,
        identifier: &'a str,
    ) -> BoxFuture<'a, Result<Option<CredentialRecord>, WriteError>>;
}

#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Students and faculty sign in by email, admins by username.
    fn query_for(role: Role) -> &'static str {
        match role {
            Role::Student => {
                "SELECT student_id AS id, name AS display_name, password AS stored_secret \
                 FROM student WHERE email = $1"
            }
            Role::Faculty => {
                "SELECT faculty_id AS id, name AS display_name, password AS stored_secret \
                 FROM faculty WHERE email = $1"
            }
            Role::Admin => {
                "SELECT admin_id AS id, username AS display_name, password AS stored_secret \
                 FROM admin WHERE username = $1"
            }
        }
    }
}

impl CredentialStore for PgCredentialStore {
    fn find<'a>(
        &'a self,
        role: Role,
        identifier: &'a str,
    ) -> BoxFuture<'a, Result<Option<CredentialRecord>, WriteError>> {
        Box::pin(async move {
            sqlx::query_as::<_, CredentialRecord>(Self::query_for(role))
                .bind(identifier)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| WriteError::ConnectivityFailure(e.to_string()))
        })
    }
}
