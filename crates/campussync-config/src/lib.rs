//! # CampusSync Config
//!
//! Configuration types for the CampusSync API.
//!
//! Every struct is loaded from environment variables and falls back to a
//! default when a variable is missing or unparsable:
//!
//! - [`database`]: connection pool sizing and the database URL
//! - [`session`]: session TTL and the session store backend
//! - [`secret`]: how stored secrets are compared
//! - [`storage`]: where uploaded assignment documents go
//! - [`server`]: listen addresses for the API and the metrics exporter
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`rate_limit`]: API rate limiting configuration
//!
//! # Example
//!
//! ```ignore
//! use campussync_config::{DatabaseConfig, SessionConfig, ServerConfig};
//!
//! let database = DatabaseConfig::from_env();
//! let session = SessionConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod rate_limit;
pub mod secret;
pub mod server;
pub mod session;
pub mod storage;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use rate_limit::RateLimitConfig;
pub use secret::{SecretConfig, SecretScheme};
pub use server::ServerConfig;
pub use session::{SessionBackend, SessionConfig};
pub use storage::StorageConfig;

/// Reads `key` and parses it, falling back to `default`.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
