use campussync_models::{IdentityResponse, Role};
use serde::{Deserialize, Serialize};

/// The verified (role, id, name) of whoever is acting.
///
/// Only the credential verifier creates one; a session store may hand back
/// one it stored earlier. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    role: Role,
    id: i32,
    display_name: String,
}

impl Identity {
    pub(crate) fn new(role: Role, id: i32, display_name: String) -> Self {
        Self {
            role,
            id,
            display_name,
        }
    }

    /// Builds an identity without verification, for tests only.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn fixture(role: Role, id: i32, display_name: &str) -> Self {
        Self::new(role, id, display_name.to_string())
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            role: identity.role,
            id: identity.id,
            display_name: identity.display_name.clone(),
        }
    }
}
