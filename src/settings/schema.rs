//! Controller settings schema.
//!
//! These are the controller's own settings, read once at startup. The
//! watched configuration domains live in the source directory instead.

use serde::{Deserialize, Serialize};

/// Root settings for the controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ControllerSettings {
    /// HTTP listener for the config API.
    pub listener: ListenerSettings,

    /// Where the configuration domains are read from.
    pub source: SourceSettings,

    /// Logging and metrics.
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerSettings {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Directory holding one `<domain>.toml` file per domain.
    pub config_dir: String,

    /// Poll interval for platforms without native file events, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            config_dir: "/etc/ingress-config".to_string(),
            poll_interval_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
