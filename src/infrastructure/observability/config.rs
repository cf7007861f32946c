//! Observability configuration

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics: MetricsConfig,
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route the scrape endpoint is mounted on
    pub path: String,
    /// Histogram buckets, in seconds, for every `*_duration_seconds` metric.
    /// Runs call a language model several times, so the range reaches minutes.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
            duration_buckets: vec![0.05, 0.25, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: ObservabilityConfig =
            serde_json::from_str(r#"{"metrics": {"enabled": false}}"#).unwrap();

        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.path, "/metrics");
        assert_eq!(config.metrics.duration_buckets.last(), Some(&300.0));
    }

    #[test]
    fn test_custom_buckets() {
        let config: MetricsConfig =
            serde_json::from_str(r#"{"duration_buckets": [1.0, 10.0]}"#).unwrap();

        assert!(config.enabled);
        assert_eq!(config.duration_buckets, vec![1.0, 10.0]);
    }
}
