//! Credential verification.
//!
//! A failed login says only that it failed. An unknown role, an unknown
//! identifier and a wrong secret all return an error that renders the same
//! way, and each path runs one secret comparison so response timing does not
//! separate them either.

use std::sync::Arc;

use campussync_core::{AuthFailure, CoreError, SecretVerifier};
use campussync_models::Role;
use tracing::instrument;

use crate::identity::Identity;
use crate::store::CredentialStore;

#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    secrets: Arc<dyn SecretVerifier>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore>, secrets: Arc<dyn SecretVerifier>) -> Self {
        Self { store, secrets }
    }

    /// Checks `identifier`/`secret` against the store for `claimed_role`.
    ///
    /// Reads only; the caller decides whether to open a session.
    #[instrument(skip(self, identifier, secret), fields(role = %claimed_role))]
    pub async fn verify(
        &self,
        identifier: &str,
        secret: &str,
        claimed_role: &str,
    ) -> Result<Identity, CoreError> {
        let role: Role = match claimed_role.parse() {
            Ok(role) => role,
            Err(failure) => {
                self.compare(secret, None).await;
                return Err(failure.into());
            }
        };

        let record = self.store.find(role, identifier).await?;

        match record {
            Some(record) => {
                if self.compare(secret, Some(record.stored_secret)).await {
                    tracing::debug!(identity_id = record.id, "Credential verified");
                    Ok(Identity::new(role, record.id, record.display_name))
                } else {
                    Err(AuthFailure::NoMatch.into())
                }
            }
            None => {
                self.compare(secret, None).await;
                Err(AuthFailure::NoMatch.into())
            }
        }
    }

    /// Compares off the async workers; `None` compares against the decoy.
    /// A malformed stored value or a crashed comparison counts as a mismatch.
    async fn compare(&self, presented: &str, stored: Option<String>) -> bool {
        let secrets = Arc::clone(&self.secrets);
        let presented = presented.to_string();
        let is_decoy = stored.is_none();

        let outcome = tokio::task::spawn_blocking(move || {
            let stored = stored.unwrap_or_else(|| secrets.decoy().to_string());
            secrets.verify(&presented, &stored)
        })
        .await;

        match outcome {
            Ok(Ok(matched)) => matched && !is_decoy,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Stored secret could not be compared");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Secret comparison task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCredentialStore;
    use campussync_core::{BcryptSecrets, PlaintextSecrets, WriteError};

    fn plaintext_verifier() -> CredentialVerifier {
        let store = MemoryCredentialStore::new()
            .with(Role::Student, "stu1@x.com", 7, "Alice", "pw")
            .with(Role::Faculty, "fac1@x.com", 5, "Dr. Rao", "teach")
            .with(Role::Admin, "root", 1, "root", "admin-pw");
        CredentialVerifier::new(Arc::new(store), Arc::new(PlaintextSecrets))
    }

    #[tokio::test]
    async fn test_verify_student_by_email() {
        let identity = plaintext_verifier()
            .verify("stu1@x.com", "pw", "student")
            .await
            .unwrap();

        assert_eq!(identity.role(), Role::Student);
        assert_eq!(identity.id(), 7);
        assert_eq!(identity.display_name(), "Alice");
    }

    #[tokio::test]
    async fn test_verify_admin_by_username() {
        let identity = plaintext_verifier()
            .verify("root", "admin-pw", "admin")
            .await
            .unwrap();
        assert_eq!(identity.role(), Role::Admin);
    }

    #[tokio::test]
    async fn test_wrong_secret_is_no_match() {
        let result = plaintext_verifier().verify("stu1@x.com", "nope", "student").await;
        assert_eq!(result, Err(AuthFailure::NoMatch.into()));
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_no_match() {
        let result = plaintext_verifier().verify("ghost@x.com", "pw", "student").await;
        assert_eq!(result, Err(AuthFailure::NoMatch.into()));
    }

    #[tokio::test]
    async fn test_only_the_claimed_roles_store_is_consulted() {
        // Valid student credentials claimed as faculty
        let result = plaintext_verifier().verify("stu1@x.com", "pw", "faculty").await;
        assert_eq!(result, Err(AuthFailure::NoMatch.into()));
    }

    #[tokio::test]
    async fn test_unknown_role_is_invalid_role() {
        let result = plaintext_verifier().verify("stu1@x.com", "pw", "professor").await;
        assert_eq!(result, Err(AuthFailure::InvalidRole.into()));
    }

    #[tokio::test]
    async fn test_store_outage_is_not_reported_as_no_match() {
        let verifier = CredentialVerifier::new(
            Arc::new(MemoryCredentialStore::unavailable()),
            Arc::new(PlaintextSecrets),
        );

        let result = verifier.verify("stu1@x.com", "pw", "student").await;
        assert!(matches!(
            result,
            Err(CoreError::Write(WriteError::ConnectivityFailure(_)))
        ));
    }

    #[tokio::test]
    async fn test_bcrypt_stored_secret() {
        let secrets = BcryptSecrets::new(4).unwrap();
        let stored = secrets.hash("pw").unwrap();
        let store = MemoryCredentialStore::new().with(Role::Faculty, "f@x.com", 5, "Bob", &stored);
        let verifier = CredentialVerifier::new(Arc::new(store), Arc::new(secrets));

        assert!(verifier.verify("f@x.com", "pw", "faculty").await.is_ok());
        assert_eq!(
            verifier.verify("f@x.com", "pW", "faculty").await,
            Err(AuthFailure::NoMatch.into())
        );
    }

    #[tokio::test]
    async fn test_malformed_stored_hash_is_no_match() {
        let store =
            MemoryCredentialStore::new().with(Role::Student, "s@x.com", 9, "Eve", "not-a-hash");
        let verifier =
            CredentialVerifier::new(Arc::new(store), Arc::new(BcryptSecrets::new(4).unwrap()));

        assert_eq!(
            verifier.verify("s@x.com", "not-a-hash", "student").await,
            Err(AuthFailure::NoMatch.into())
        );
    }

    mod logged_fields {
        use std::fmt;
        use std::sync::{Arc, Mutex};

        use tracing::field::{Field, Visit};
        use tracing::span::Attributes;
        use tracing::{Event, Id, Subscriber};
        use tracing_subscriber::layer::{Context, Layer};

        /// Collects every `name=value` recorded on spans and events.
        #[derive(Clone, Default)]
        pub struct Recorded(pub Arc<Mutex<Vec<String>>>);

        impl Visit for Recorded {
            fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                self.0
                    .lock()
                    .unwrap()
                    .push(format!("{}={:?}", field.name(), value));
            }
        }

        impl<S: Subscriber> Layer<S> for Recorded {
            fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
                attrs.record(&mut self.clone());
            }

            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                event.record(&mut self.clone());
            }
        }
    }

    #[tokio::test]
    async fn test_login_tracing_records_role_but_not_identifier_or_secret() {
        use tracing_subscriber::layer::SubscriberExt;

        let recorded = logged_fields::Recorded::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let verifier = plaintext_verifier();
        verifier.verify("stu1@x.com", "pw", "student").await.unwrap();
        let _ = verifier.verify("stu1@x.com", "nope", "student").await;

        let fields = recorded.0.lock().unwrap().clone();
        assert!(fields.iter().any(|f| f.starts_with("role=")), "{:?}", fields);
        assert!(!fields.iter().any(|f| f.contains("stu1@x.com")), "{:?}", fields);
        assert!(!fields.iter().any(|f| f.contains("pw")), "{:?}", fields);
        assert!(!fields.iter().any(|f| f.starts_with("identifier=")), "{:?}", fields);
    }
}
