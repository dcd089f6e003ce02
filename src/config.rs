//! Runtime configuration read from the environment

use std::env;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_API_BASE_URL: &str = "https://api.wizbot.app";
pub const DEFAULT_LOGIN_URL: &str = "https://wizbot.app/login";
pub const DEFAULT_MPV_PATH: &str = "mpv";

const POLL_INTERVAL_VAR: &str = "WIZBOT_POLL_INTERVAL";
const API_BASE_VAR: &str = "WIZBOT_API_BASE";
const LOGIN_URL_VAR: &str = "WIZBOT_LOGIN_URL";
const MPV_PATH_VAR: &str = "WIZBOT_MPV_PATH";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub poll_interval: Duration,
    pub api_base_url: String,
    pub login_url: String,
    pub mpv_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            mpv_path: DEFAULT_MPV_PATH.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing or blank values
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = value(POLL_INTERVAL_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.poll_interval = Duration::from_millis(ms),
                _ => tracing::warn!(
                    value = %raw,
                    default_ms = DEFAULT_POLL_INTERVAL_MS,
                    "Invalid {}, using default",
                    POLL_INTERVAL_VAR
                ),
            }
        }

        if let Some(base) = value(API_BASE_VAR) {
            config.api_base_url = base;
        }

        if let Some(login) = value(LOGIN_URL_VAR) {
            config.login_url = login;
        }

        if let Some(mpv) = value(MPV_PATH_VAR) {
            config.mpv_path = mpv;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.api_base_url, "https://api.wizbot.app");
        assert_eq!(config.login_url, "https://wizbot.app/login");
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("WIZBOT_POLL_INTERVAL", "2500"),
            ("WIZBOT_API_BASE", "http://localhost:8080"),
            ("WIZBOT_LOGIN_URL", "http://localhost:8080/login"),
            ("WIZBOT_MPV_PATH", "/opt/mpv/bin/mpv"),
        ]));

        assert_eq!(config.poll_interval, Duration::from_millis(2500));
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.login_url, "http://localhost:8080/login");
        assert_eq!(config.mpv_path, "/opt/mpv/bin/mpv");
    }

    #[test]
    fn invalid_poll_interval_falls_back() {
        for raw in ["soon", "-5", "0", "  "] {
            let config = AppConfig::from_lookup(lookup_from(&[("WIZBOT_POLL_INTERVAL", raw)]));
            assert_eq!(config.poll_interval, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
        }
    }
}
