//! In-memory [`CredentialStore`] for tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use campussync_core::{BoxFuture, WriteError};
use campussync_models::Role;

use crate::store::{CredentialRecord, CredentialStore};

#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    rows: Arc<RwLock<HashMap<(Role, String), CredentialRecord>>>,
    unavailable: bool,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every lookup fails as if the database were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with(
        self,
        role: Role,
        identifier: &str,
        id: i32,
        display_name: &str,
        stored_secret: &str,
    ) -> Self {
        if let Ok(mut rows) = self.rows.write() {
            rows.insert(
                (role, identifier.to_string()),
                CredentialRecord {
                    id,
                    display_name: display_name.to_string(),
                    stored_secret: stored_secret.to_string(),
                },
            );
        }
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn find<'a>(
        &'a self,
        role: Role,
        identifier: &'a str,
    ) -> BoxFuture<'a, Result<Option<CredentialRecord>, WriteError>> {
        Box::pin(async move {
            if self.unavailable {
                return Err(WriteError::ConnectivityFailure(
                    "credential store unreachable".to_string(),
                ));
            }
            let rows = self
                .rows
                .read()
                .map_err(|e| WriteError::ConnectivityFailure(e.to_string()))?;
            Ok(rows.get(&(role, identifier.to_string())).cloned())
        })
    }
}
