//! # CampusSync Cache
//!
//! Redis-backed storage for sessions shared across API instances.
//!
//! - [`redis`]: thin JSON-over-Redis client with per-key TTLs
//! - [`keys`]: key derivation; bearer tokens are never stored in clear
//! - [`sessions`]: [`RedisSessionStore`], the Redis implementation of
//!   `campussync_auth::SessionStore`
//!
//! # Example
//!
//! ```ignore
//! use campussync_cache::{RedisCache, RedisSessionStore};
//!
//! let cache = RedisCache::new("redis://localhost:6379").await?;
//! let sessions = RedisSessionStore::new(cache, Duration::from_secs(1800));
//! ```

pub mod keys;
pub mod redis;
pub mod sessions;

pub use keys::session_key;
pub use redis::{CacheError, RedisCache};
pub use sessions::RedisSessionStore;
