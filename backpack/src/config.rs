//! Configuration (§6, §9): the handful of environment keys the
//! observability spine reads directly. Full config-file loading and CLI
//! wiring are out of scope (spec §1) — there are no precedence layers or
//! file formats here, just these named keys with their documented
//! defaults.

use crate::logging::Level;
use std::time::Duration;

/// Default remote level-service poll interval (spec §9).
pub const DEFAULT_FETCH_INTERVAL: Duration = Duration::from_secs(15);

/// Default remote level-service HTTP request timeout (spec §4.9).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The `LOG_LEVEL` environment variable, parsed with the same
/// unknown-value-falls-back-to-INFO rule as [`Level::parse`].
#[must_use]
pub fn log_level() -> Level {
    std::env::var("LOG_LEVEL").map(|v| Level::parse(&v)).unwrap_or(Level::Info)
}

/// Remote log-level service configuration read from the environment.
/// Returns `None` when `REMOTE_LOG_URL` is unset — the service is simply
/// not started in that case, same as any other optional adjacent
/// collaborator.
#[derive(Debug, Clone)]
pub struct RemoteLevelConfig {
    pub url: String,
    pub access_key: String,
    pub app_name: String,
    pub fetch_interval: Duration,
    pub request_timeout: Duration,
}

impl RemoteLevelConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("REMOTE_LOG_URL").ok()?;
        let access_key = std::env::var("REMOTE_ACCESS_KEY").unwrap_or_default();
        let app_name = std::env::var("APP_NAME").unwrap_or_default();
        let fetch_interval = std::env::var("LOG_FETCH_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(DEFAULT_FETCH_INTERVAL, Duration::from_secs);

        Some(Self {
            url,
            access_key,
            app_name,
            fetch_interval,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn missing_log_level_env_defaults_to_info() {
        unsafe { std::env::remove_var("LOG_LEVEL") };
        assert_eq!(log_level(), Level::Info);
    }

    #[test]
    #[serial]
    fn log_level_env_is_parsed_case_insensitively() {
        unsafe { std::env::set_var("LOG_LEVEL", "debug") };
        assert_eq!(log_level(), Level::Debug);
        unsafe { std::env::remove_var("LOG_LEVEL") };
    }

    #[test]
    #[serial]
    fn remote_config_absent_without_url() {
        unsafe { std::env::remove_var("REMOTE_LOG_URL") };
        assert!(RemoteLevelConfig::from_env().is_none());
    }

    #[test]
    #[serial]
    fn remote_config_defaults_fetch_interval_to_fifteen_seconds() {
        unsafe {
            std::env::set_var("REMOTE_LOG_URL", "https://example.test/levels");
            std::env::remove_var("LOG_FETCH_INTERVAL");
        }
        let config = RemoteLevelConfig::from_env().unwrap();
        assert_eq!(config.fetch_interval, DEFAULT_FETCH_INTERVAL);
        unsafe { std::env::remove_var("REMOTE_LOG_URL") };
    }
}
