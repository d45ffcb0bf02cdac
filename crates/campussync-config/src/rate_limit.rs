//! Per-IP rate limits.
//!
//! Login gets its own, stricter bucket so credential guessing is throttled
//! independently of ordinary dashboard traffic.
//!
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: token refill interval for general routes (default: 2)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: bucket size for general routes (default: 30)
//! - `RATE_LIMIT_LOGIN_PER_SECOND`: token refill interval for login (default: 10)
//! - `RATE_LIMIT_LOGIN_BURST_SIZE`: bucket size for login (default: 5)

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::PeerIpKeyExtractor;

use crate::env_or;

pub type PeerIpGovernor = GovernorConfig<PeerIpKeyExtractor, ::governor::middleware::NoOpMiddleware>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub general_per_second: u64,
    pub general_burst_size: u32,
    pub login_per_second: u64,
    pub login_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_second: 2,
            general_burst_size: 30,
            login_per_second: 10,
            login_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            general_per_second: env_or("RATE_LIMIT_GENERAL_PER_SECOND", defaults.general_per_second),
            general_burst_size: env_or("RATE_LIMIT_GENERAL_BURST_SIZE", defaults.general_burst_size),
            login_per_second: env_or("RATE_LIMIT_LOGIN_PER_SECOND", defaults.login_per_second),
            login_burst_size: env_or("RATE_LIMIT_LOGIN_BURST_SIZE", defaults.login_burst_size),
        }
    }

    /// # Panics
    ///
    /// Panics if either value is zero.
    #[must_use]
    pub fn general_governor_config(&self) -> PeerIpGovernor {
        Self::build(self.general_per_second, self.general_burst_size)
    }

    /// # Panics
    ///
    /// Panics if either value is zero.
    #[must_use]
    pub fn login_governor_config(&self) -> PeerIpGovernor {
        Self::build(self.login_per_second, self.login_burst_size)
    }

    fn build(per_second: u64, burst_size: u32) -> PeerIpGovernor {
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("Rate limit values must be non-zero")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.general_per_second, 2);
        assert_eq!(config.general_burst_size, 30);
        assert_eq!(config.login_per_second, 10);
        assert_eq!(config.login_burst_size, 5);
    }

    #[test]
    fn test_governor_configs_build_from_defaults() {
        let config = RateLimitConfig::default();
        let _ = config.general_governor_config();
        let _ = config.login_governor_config();
    }
}
