//! Opaque-token sessions.
//!
//! A session binds a random bearer token to one [`Identity`] until it is
//! destroyed or its TTL runs out. Expiry is absolute from creation; using a
//! session does not extend it.

use std::collections::HashMap;
use std::time::Duration;

use campussync_core::{AppError, BoxFuture};
use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::identity::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(identity: Identity, ttl: Duration) -> Self {
        let created_at = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));
        Self {
            token: generate_token(),
            identity,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// 32 random bytes, hex-encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
    #[error("stored session is unreadable: {0}")]
    Corrupt(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        tracing::error!(error = %err, "Session store failure");
        AppError::unavailable("Session service unavailable")
    }
}

/// Internally synchronized store of live sessions.
pub trait SessionStore: Send + Sync {
    fn create(&self, identity: Identity) -> BoxFuture<'_, Result<Session, SessionError>>;

    /// `Ok(None)` for unknown or expired tokens.
    fn lookup<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Option<Session>, SessionError>>;

    /// Returns whether a session was removed.
    fn destroy<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<bool, SessionError>>;

    /// Drops every expired session, returning how many were removed.
    fn purge_expired(&self) -> BoxFuture<'_, Result<usize, SessionError>>;
}

/// Process-local session store.
#[derive(Debug)]
pub struct InMemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, identity: Identity) -> BoxFuture<'_, Result<Session, SessionError>> {
        Box::pin(async move {
            let session = Session::new(identity, self.ttl);
            self.sessions
                .write()
                .await
                .insert(session.token.clone(), session.clone());
            Ok(session)
        })
    }

    fn lookup<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Option<Session>, SessionError>> {
        Box::pin(async move {
            let now = Utc::now();
            {
                let sessions = self.sessions.read().await;
                match sessions.get(token) {
                    None => return Ok(None),
                    Some(session) if !session.is_expired_at(now) => {
                        return Ok(Some(session.clone()));
                    }
                    Some(_) => {}
                }
            }

            self.sessions.write().await.remove(token);
            Ok(None)
        })
    }

    fn destroy<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<bool, SessionError>> {
        Box::pin(async move { Ok(self.sessions.write().await.remove(token).is_some()) })
    }

    fn purge_expired(&self) -> BoxFuture<'_, Result<usize, SessionError>> {
        Box::pin(async move {
            let now = Utc::now();
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|_, session| !session.is_expired_at(now));
            Ok(before - sessions.len())
        })
    }
}
