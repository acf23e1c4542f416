//! HTTP API handlers.

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use metrics_process::Collector;
use serde::{Deserialize, Serialize};

use crate::metrics::EXPOSITION_CONTENT_TYPE;
use crate::utils::{hostname, iso_timestamp};

/// Greeting returned by the root endpoint.
pub const ROOT_MESSAGE: &str = "Sample DevOps Application";

/// Service version reported by the root endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the global Prometheus recorder.
    pub metrics: PrometheusHandle,
    /// Process metrics collector, sampled on every scrape.
    pub process: Arc<Collector>,
    /// Host name, resolved once at startup.
    pub hostname: Arc<str>,
}

impl AppState {
    /// Create new app state around an installed recorder.
    pub fn new(metrics: PrometheusHandle) -> Self {
        let process = Collector::default();
        process.describe();

        Self {
            metrics,
            process: Arc::new(process),
            hostname: hostname().into(),
        }
    }
}

/// Root response.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    /// Greeting.
    pub message: String,
    /// ISO-8601 UTC timestamp.
    pub timestamp: String,
    /// Service version.
    pub version: String,
    /// Host serving the request.
    pub hostname: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status: "healthy".
    pub status: String,
    /// ISO-8601 UTC timestamp.
    pub timestamp: String,
}

/// Root handler - greeting with version and host.
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
        timestamp: iso_timestamp(),
        version: VERSION.to_string(),
        hostname: state.hostname.to_string(),
    })
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: iso_timestamp(),
    })
}

/// Metrics handler - Prometheus text exposition of everything recorded so far.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.process.collect();

    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_package() {
        assert_eq!(VERSION, "1.0.0");
    }

    #[test]
    fn health_response_serializes_status_field() {
        let body = serde_json::to_value(HealthResponse {
            status: "healthy".to_string(),
            timestamp: iso_timestamp(),
        })
        .unwrap();

        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }
}
