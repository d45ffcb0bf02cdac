//! Session lifetime and storage backend.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::env_or;

/// Where session records live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Redis,
}

impl FromStr for SessionBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown session store '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Idle lifetime of a session. Each successful lookup does not extend it.
    pub ttl: Duration,
    pub backend: SessionBackend,
    pub redis_url: Option<String>,
    /// How often the in-memory store sweeps expired sessions.
    pub purge_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(1800),
            backend: SessionBackend::Memory,
            redis_url: None,
            purge_interval: Duration::from_secs(60),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let redis_url = env::var("REDIS_URL").ok().filter(|v| !v.is_empty());
        let backend = env_or("SESSION_STORE", SessionBackend::Memory);

        Self {
            ttl: Duration::from_secs(env_or("SESSION_TTL_SECONDS", 1800)),
            backend,
            redis_url,
            purge_interval: Duration::from_secs(env_or("SESSION_PURGE_INTERVAL_SECONDS", 60)),
        }
    }
}
