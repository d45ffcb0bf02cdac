use std::time::Duration;

use campussync_auth::{Identity, Session, SessionError, SessionStore};
use campussync_core::BoxFuture;
use chrono::{DateTime, Utc};

use crate::keys::session_key;
use crate::redis::{CacheError, RedisCache};

/// Sessions in Redis, expired by Redis itself through the key TTL.
#[derive(Clone, Debug)]
pub struct RedisSessionStore {
    cache: RedisCache,
    ttl: Duration,
}

impl RedisSessionStore {
    pub fn new(cache: RedisCache, ttl: Duration) -> Self {
        Self { cache, ttl }
    }
}

/// Drops a stored session whose own expiry has passed. The key TTL is
/// rounded to whole seconds; the stored expiry is exact.
fn unexpired(session: Option<Session>, now: DateTime<Utc>) -> Option<Session> {
    session.filter(|s| !s.is_expired_at(now))
}

impl From<CacheError> for SessionError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Connection(e) => SessionError::Unavailable(e.to_string()),
            CacheError::Serialization(e) => SessionError::Corrupt(e.to_string()),
        }
    }
}

impl SessionStore for RedisSessionStore {
    fn create(&self, identity: Identity) -> BoxFuture<'_, Result<Session, SessionError>> {
        Box::pin(async move {
            let session = Session::new(identity, self.ttl);
            self.cache
                .set_with_ttl(&session_key(&session.token), &session, self.ttl)
                .await?;
            Ok(session)
        })
    }

    fn lookup<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<Option<Session>, SessionError>> {
        Box::pin(async move {
            let session: Option<Session> = self.cache.get(&session_key(token)).await?;
            Ok(unexpired(session, Utc::now()))
        })
    }

    fn destroy<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<bool, SessionError>> {
        Box::pin(async move { Ok(self.cache.invalidate(&session_key(token)).await?) })
    }

    fn purge_expired(&self) -> BoxFuture<'_, Result<usize, SessionError>> {
        Box::pin(async { Ok(0) })
    }
}
