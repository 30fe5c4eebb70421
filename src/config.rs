//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::{DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of store shards, rounded up to a power of two by the store
    pub shard_count: usize,
    /// Lifetime of a cached user response, in seconds
    pub cache_ttl: u64,
    /// Deadline for each store call made on behalf of a request, in seconds
    pub request_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cache cleanup interval in seconds, 0 disables it
    pub cleanup_interval: u64,
    /// bcrypt work factor for stored passwords
    pub password_cost: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHARD_COUNT` - Store shards (default: 16)
    /// - `CACHE_TTL_SECS` - Cache entry TTL in seconds (default: 30)
    /// - `REQUEST_TIMEOUT_SECS` - Per-request store deadline (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CLEANUP_INTERVAL_SECS` - Cache cleanup frequency in seconds (default: 60)
    /// - `PASSWORD_HASH_COST` - bcrypt cost, clamped to 4..=31 (default: 12)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            shard_count: env_or("SHARD_COUNT", defaults.shard_count),
            cache_ttl: env_or("CACHE_TTL_SECS", defaults.cache_ttl),
            request_timeout: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL_SECS", defaults.cleanup_interval),
            password_cost: env_or("PASSWORD_HASH_COST", defaults.password_cost)
                .clamp(MIN_HASH_COST, MAX_HASH_COST),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// `None` when the background cleanup task is disabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval > 0).then(|| Duration::from_secs(self.cleanup_interval))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: 16,
            cache_ttl: 30,
            request_timeout: 5,
            server_port: 8080,
            cleanup_interval: 60,
            password_cost: DEFAULT_HASH_COST,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cleanup_interval(), Some(Duration::from_secs(60)));
        assert_eq!(config.password_cost, DEFAULT_HASH_COST);
    }

    #[test]
    fn test_cleanup_disabled_at_zero() {
        let config = Config {
            cleanup_interval: 0,
            ..Config::default()
        };
        assert_eq!(config.cleanup_interval(), None);
    }

    // Single test touching the environment so parallel tests never race on it
    #[test]
    fn test_config_from_env() {
        env::remove_var("SHARD_COUNT");
        env::remove_var("CACHE_TTL_SECS");
        env::remove_var("REQUEST_TIMEOUT_SECS");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL_SECS");
        env::remove_var("PASSWORD_HASH_COST");

        let config = Config::from_env();
        assert_eq!(config.shard_count, 16);
        assert_eq!(config.cache_ttl, 30);
        assert_eq!(config.server_port, 8080);

        env::set_var("SHARD_COUNT", "64");
        env::set_var("SERVER_PORT", "not-a-port");
        env::set_var("PASSWORD_HASH_COST", "99");

        let config = Config::from_env();
        assert_eq!(config.shard_count, 64);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.password_cost, MAX_HASH_COST);

        env::set_var("PASSWORD_HASH_COST", "1");
        assert_eq!(Config::from_env().password_cost, MIN_HASH_COST);

        env::remove_var("SHARD_COUNT");
        env::remove_var("SERVER_PORT");
        env::remove_var("PASSWORD_HASH_COST");
    }
}
