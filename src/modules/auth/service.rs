use campussync_auth::{CredentialVerifier, Session, SessionStore};
use campussync_core::AppError;
use campussync_models::LoginRequest;
use tracing::instrument;

use crate::metrics::{track_login_failure, track_login_success};

pub struct AuthService;

impl AuthService {
    /// Verifies the credential and opens a session for it.
    #[instrument(skip(verifier, sessions, dto), fields(role = %dto.role))]
    pub async fn login(
        verifier: &CredentialVerifier,
        sessions: &dyn SessionStore,
        dto: LoginRequest,
    ) -> Result<Session, AppError> {
        let identity = match verifier.verify(&dto.identifier, &dto.secret, &dto.role).await {
            Ok(identity) => identity,
            Err(e) => {
                track_login_failure(&dto.role, e.as_auth());
                tracing::info!(error = %e, "Login rejected");
                return Err(e.into());
            }
        };

        let session = sessions.create(identity).await?;
        track_login_success(session.identity.role());
        tracing::info!(
            identity_id = session.identity.id(),
            role = %session.identity.role(),
            "Session opened"
        );

        Ok(session)
    }

    #[instrument(skip(sessions, session), fields(identity_id = session.identity.id()))]
    pub async fn logout(sessions: &dyn SessionStore, session: &Session) -> Result<(), AppError> {
        if !sessions.destroy(&session.token).await? {
            tracing::debug!("Session already gone at logout");
        }
        Ok(())
    }
}
