//! Application-level configuration loading: liveness timings and viewer hub sizing.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DART_BACK_CONFIG_PATH";
/// Boards silent for longer than this are considered dead.
const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(10);
/// Snapshots buffered per viewer before the oldest ones are dropped.
const DEFAULT_HUB_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    heartbeat_timeout: Duration,
    watchdog_interval: Duration,
    hub_capacity: usize,
}

impl AppConfig {
    /// Build a configuration from explicit values.
    pub fn new(
        heartbeat_timeout: Duration,
        watchdog_interval: Duration,
        hub_capacity: usize,
    ) -> Self {
        Self {
            heartbeat_timeout,
            watchdog_interval,
            hub_capacity: hub_capacity.max(1),
        }
    }

    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        heartbeat_timeout = ?app_config.heartbeat_timeout,
                        watchdog_interval = ?app_config.watchdog_interval,
                        hub_capacity = app_config.hub_capacity,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// How long a board may stay silent before the watchdog evicts it.
    pub fn heartbeat_timeout(&self) -> Duration {
        self.heartbeat_timeout
    }

    /// Period between two watchdog sweeps.
    pub fn watchdog_interval(&self) -> Duration {
        self.watchdog_interval
    }

    /// Per-viewer buffer size of every game hub.
    pub fn hub_capacity(&self) -> usize {
        self.hub_capacity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_HEARTBEAT_TIMEOUT,
            DEFAULT_HEARTBEAT_TIMEOUT,
            DEFAULT_HUB_CAPACITY,
        )
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    heartbeat_timeout_secs: Option<u64>,
    watchdog_interval_secs: Option<u64>,
    hub_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let heartbeat_timeout = value
            .heartbeat_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HEARTBEAT_TIMEOUT);
        // The sweep follows the heartbeat timeout unless configured separately.
        let watchdog_interval = value
            .watchdog_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(heartbeat_timeout);
        Self::new(
            heartbeat_timeout,
            watchdog_interval,
            value.hub_capacity.unwrap_or(DEFAULT_HUB_CAPACITY),
        )
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watchdog_interval_defaults_to_heartbeat_timeout() {
        let raw: RawConfig = serde_json::from_str(r#"{"heartbeat_timeout_secs": 4}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.heartbeat_timeout(), Duration::from_secs(4));
        assert_eq!(config.watchdog_interval(), Duration::from_secs(4));
        assert_eq!(config.hub_capacity(), DEFAULT_HUB_CAPACITY);
    }

    #[test]
    fn explicit_values_win() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"heartbeat_timeout_secs": 30, "watchdog_interval_secs": 5, "hub_capacity": 4}"#,
        )
        .unwrap();
        assert_eq!(
            AppConfig::from(raw),
            AppConfig::new(Duration::from_secs(30), Duration::from_secs(5), 4)
        );
    }

    #[test]
    fn zero_values_fall_back_to_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"heartbeat_timeout_secs": 0, "hub_capacity": 0}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.heartbeat_timeout(), DEFAULT_HEARTBEAT_TIMEOUT);
        assert_eq!(config.hub_capacity(), 1);
    }
}
