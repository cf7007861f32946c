//! Prometheus exporter and the metric helpers shared by the HTTP and oracle layers
//!
//! The workflow executor records its own `workflow_*` series directly with the
//! `metrics` macros; everything here is keyed by route or by model.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Handle used to render the scrape endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn builder(config: &MetricsConfig) -> PrometheusBuilder {
    let builder = PrometheusBuilder::new();
    if config.duration_buckets.is_empty() {
        return builder;
    }

    match builder.set_buckets_for_metric(
        Matcher::Suffix("duration_seconds".to_string()),
        &config.duration_buckets,
    ) {
        Ok(builder) => builder,
        Err(e) => {
            tracing::warn!("Ignoring configured duration buckets: {}", e);
            PrometheusBuilder::new()
        }
    }
}

/// Install the global recorder; `None` when disabled or when one is already installed
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match builder(config).install_recorder() {
        Ok(handle) => {
            gauge!("neuron_agent_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!(path = %config.path, "Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path().to_string();
    Router::new()
        .route(&path, get(render_metrics))
        .with_state(metrics)
}

async fn render_metrics(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// `route` should be the matched route pattern, never the raw URI
pub fn record_http_request(method: &str, route: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// One call to a language model
pub struct LlmRequestMetricParams<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    /// planner, solver or oracle
    pub role: &'a str,
    pub duration: Duration,
    pub success: bool,
}

pub fn record_llm_request(params: LlmRequestMetricParams) {
    let labels = [
        ("provider", params.provider.to_string()),
        ("model", params.model.to_string()),
        ("role", params.role.to_string()),
        ("status", if params.success { "success" } else { "error" }.to_string()),
    ];

    counter!("llm_requests_total", &labels).increment(1);
    histogram!("llm_request_duration_seconds", &labels).record(params.duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_metrics_are_not_installed() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        assert!(init_metrics(&config).is_none());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_http_request("GET", "/v1/operations", 200, Duration::from_millis(3));
        record_llm_request(LlmRequestMetricParams {
            provider: "ollama",
            model: "gemma2:2b",
            role: "planner",
            duration: Duration::from_millis(40),
            success: false,
        });
    }

    #[test]
    fn test_rendered_buckets() {
        let recorder = builder(&MetricsConfig {
            duration_buckets: vec![1.0, 60.0],
            ..MetricsConfig::default()
        })
        .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            histogram!("workflow_run_duration_seconds").record(2.0);
        });

        let output = handle.render();
        assert!(output.contains("workflow_run_duration_seconds_bucket"));
        assert!(!output.contains("quantile"));
    }
}
