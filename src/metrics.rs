//! Prometheus metrics for HTTP request instrumentation.
//!
//! This module owns the process-wide recorder and provides:
//! - Request duration histogram keyed by method, route and status code
//! - Request counter keyed by the same labels
//! - Process metrics (CPU, memory, file descriptors) sampled on scrape

use std::future::Future;
use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::Result;

// === Metric Name Constants ===

/// HTTP request duration histogram metric name.
pub const METRIC_HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Histogram buckets in seconds, matching the usual client library defaults.
pub const HTTP_DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// How often buffered histogram samples are folded into their buckets.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder.
///
/// Only the first call installs anything; later calls hand back a clone of
/// the same handle, so tests and `main` can both call it freely.
pub fn install() -> Result<PrometheusHandle> {
    let handle = HANDLE.get_or_try_init(|| -> Result<PrometheusHandle> {
        let handle = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(METRIC_HTTP_REQUEST_DURATION.to_string()),
                HTTP_DURATION_BUCKETS,
            )?
            .install_recorder()?;
        init_metrics();
        debug!("Prometheus recorder installed");
        Ok(handle)
    })?;

    Ok(handle.clone())
}

/// Register metric descriptions.
/// Called once by [`install`] after the recorder is in place.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_DURATION,
        Unit::Seconds,
        "Duration of HTTP requests in seconds"
    );
    describe_counter!(
        METRIC_HTTP_REQUESTS_TOTAL,
        "Total number of HTTP requests"
    );
}

/// Run recorder upkeep every `period` until `shutdown` resolves.
///
/// Histogram observations are buffered until upkeep drains them, so this has
/// to run even when nobody scrapes `/metrics`. Returns the number of passes.
pub async fn run_upkeep<F>(handle: PrometheusHandle, period: Duration, shutdown: F) -> u64
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut passes = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                handle.run_upkeep();
                passes += 1;
            }
        }
    }

    debug!(passes, "Metrics upkeep stopped");
    passes
}

/// Labels attached to both HTTP metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLabels {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Matched route template, or the raw path when nothing matched.
    pub route: String,
    /// Response status code as a decimal string.
    pub status_code: String,
}

impl RequestLabels {
    /// Build labels from request/response parts.
    pub fn new(method: impl Into<String>, route: impl Into<String>, status: u16) -> Self {
        Self {
            method: method.into(),
            route: route.into(),
            status_code: status.to_string(),
        }
    }

    fn as_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("method", self.method.clone()),
            ("route", self.route.clone()),
            ("status_code", self.status_code.clone()),
        ]
    }
}

/// Record a completed HTTP request: one duration observation and one count.
pub fn record_http_request(start: Instant, labels: &RequestLabels) {
    let duration = start.elapsed().as_secs_f64();
    let pairs = labels.as_pairs();

    histogram!(METRIC_HTTP_REQUEST_DURATION, &pairs).record(duration);
    counter!(METRIC_HTTP_REQUESTS_TOTAL, &pairs).increment(1);
}
