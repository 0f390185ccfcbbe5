//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::probe::MemberEndpoint;

/// Root configuration for the cluster monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Cluster members to monitor.
    pub members: Vec<MemberConfig>,

    /// Per-member probe settings.
    pub probe: ProbeConfig,

    /// Evaluation cadence.
    pub evaluation: EvaluationConfig,

    /// Latency recorder window settings.
    pub latency: LatencyConfig,

    /// Status API settings.
    pub api: ApiConfig,

    /// Logging and telemetry settings.
    pub observability: ObservabilityConfig,
}

impl MonitorConfig {
    /// Parse the configured members into endpoints.
    ///
    /// Callers that went through validation will not see errors here, but
    /// the parse stays fallible for programmatic construction.
    pub fn member_endpoints(&self) -> Result<Vec<MemberEndpoint>, url::ParseError> {
        self.members
            .iter()
            .map(|m| Url::parse(&m.url).map(|url| MemberEndpoint::new(m.name.clone(), url)))
            .collect()
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.timeout_ms)
    }

    pub fn evaluation_interval(&self) -> Duration {
        Duration::from_secs(self.evaluation.interval_secs)
    }

    pub fn latency_window(&self) -> Duration {
        Duration::from_secs(self.latency.window_secs)
    }
}

/// One cluster member.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemberConfig {
    /// Stable member name used in logs and summaries.
    pub name: String,

    /// Base URL of the member's client API (e.g., "http://10.0.0.1:2379").
    pub url: String,
}

/// Per-member status probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-member probe timeout in milliseconds. Also bounds the whole
    /// evaluation, since probes run concurrently.
    pub timeout_ms: u64,

    /// Path of the member status document.
    pub status_path: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            status_path: "/status".to_string(),
        }
    }
}

/// Evaluation driver settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Seconds between evaluation cycles. Cycles never overlap.
    pub interval_secs: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self { interval_secs: 10 }
    }
}

/// Latency recorder settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Trailing time window in seconds.
    pub window_secs: u64,

    /// Maximum retained samples per request kind.
    pub capacity: usize,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            capacity: 4096,
        }
    }
}

/// Status API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Serve the status API.
    pub enabled: bool,

    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Logging and telemetry settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,

    /// Expose Prometheus gauges.
    pub metrics_enabled: bool,

    /// Prometheus exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_json: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert!(config.members.is_empty());
        assert_eq!(config.probe.timeout_ms, 5_000);
        assert_eq!(config.probe.status_path, "/status");
        assert_eq!(config.evaluation.interval_secs, 10);
        assert_eq!(config.latency.window_secs, 60);
        assert_eq!(config.latency.capacity, 4096);
        assert!(config.api.enabled);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_minimal_toml() {
        let config: MonitorConfig = toml::from_str(
            r#"
            [[members]]
            name = "m1"
            url = "http://10.0.0.1:2379"

            [[members]]
            name = "m2"
            url = "http://10.0.0.2:2379"
            "#,
        )
        .unwrap();
        assert_eq!(config.members.len(), 2);
        assert_eq!(config.probe.timeout_ms, 5_000);

        let endpoints = config.member_endpoints().unwrap();
        assert_eq!(endpoints[1].name, "m2");
        assert_eq!(endpoints[1].url.as_str(), "http://10.0.0.2:2379/");
    }

    #[test]
    fn test_section_overrides() {
        let config: MonitorConfig = toml::from_str(
            r#"
            [[members]]
            name = "m1"
            url = "http://10.0.0.1:2379"

            [probe]
            timeout_ms = 750

            [evaluation]
            interval_secs = 5

            [observability]
            metrics_enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(config.probe_timeout(), Duration::from_millis(750));
        assert_eq!(config.evaluation_interval(), Duration::from_secs(5));
        assert!(config.observability.metrics_enabled);
    }
}
