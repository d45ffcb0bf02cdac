use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use campussync_auth::{Identity, Session, router};
use campussync_core::{AppError, AuthFailure};
use campussync_models::Role;

use crate::metrics::track_authorization_denied;
use crate::state::AppState;

/// Pulls the bearer token out of the `Authorization` header.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Records a denial and converts it for the response.
pub fn deny(failure: AuthFailure) -> AppError {
    track_authorization_denied(failure);
    tracing::info!(reason = failure.as_str(), "Request denied");
    failure.into()
}

/// The caller's session, if a live one was presented.
///
/// A missing, malformed, unknown or expired token all yield `None`; only a
/// session store failure rejects the request outright.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }

    pub fn require(&self, role: Role) -> Result<Identity, AppError> {
        router::authorize(self.session(), role).map_err(deny)
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(CurrentSession(None));
        };

        let session = state.sessions.lookup(token).await?;
        Ok(CurrentSession(session))
    }
}

/// Any live session.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Session);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentSession::from_request_parts(parts, state).await? {
            CurrentSession(Some(session)) => Ok(Authenticated(session)),
            CurrentSession(None) => Err(deny(AuthFailure::NoSession)),
        }
    }
}

/// A live admin session.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Identity);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = CurrentSession::from_request_parts(parts, state).await?;
        session.require(Role::Admin).map(RequireAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
