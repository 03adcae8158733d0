//! Configuration types for hyper-telemetry

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable that overrides `backend.base_url`
pub const BACKEND_URL_ENV: &str = "HYPER_BACKEND_URL";

/// Local development backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Backend service location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl BackendConfig {
    /// Join a path onto the base URL without doubling slashes
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// `GET /health` endpoint
    pub fn health_url(&self) -> String {
        self.endpoint("health")
    }

    /// Market event stream endpoint
    pub fn market_stream_url(&self) -> String {
        self.endpoint("sse/market")
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Health poller configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollerConfig {
    /// Fixed polling cadence (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,

    /// Per-request timeout (milliseconds)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    5000
}
fn default_request_timeout_ms() -> u64 {
    4000
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            request_timeout_ms: 4000,
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Event stream transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamConfig {
    /// Delay before the first reconnection attempt (milliseconds)
    #[serde(default = "default_initial_reconnect_ms")]
    pub initial_reconnect_ms: u64,

    /// Upper bound for the doubling reconnection delay (milliseconds)
    #[serde(default = "default_max_reconnect_ms")]
    pub max_reconnect_ms: u64,

    /// Reconnection attempts before giving up (0 = infinite)
    #[serde(default)]
    pub max_reconnect_attempts: u32,
}

fn default_initial_reconnect_ms() -> u64 {
    3000
}
fn default_max_reconnect_ms() -> u64 {
    30_000
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            initial_reconnect_ms: 3000,
            max_reconnect_ms: 30_000,
            max_reconnect_attempts: 0,
        }
    }
}

/// Chart window configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartConfig {
    /// Number of samples kept in the sliding window
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
}

fn default_window_capacity() -> usize {
    crate::chart::WINDOW_CAPACITY
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            window_capacity: crate::chart::WINDOW_CAPACITY,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus exporter port; exporter disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `HYPER_BACKEND_URL` when it is set and non-empty
    pub fn with_env_overrides(self) -> Self {
        self.with_backend_override(std::env::var(BACKEND_URL_ENV).ok())
    }

    fn with_backend_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend.base_url = url;
        }
        self
    }
}
