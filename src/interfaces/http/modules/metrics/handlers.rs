//! Prometheus metrics endpoint
//!
//! `GET /metrics` renders whatever the installed
//! `metrics-exporter-prometheus` recorder has collected: HTTP traffic from
//! the middleware plus the booking counters
//! (`reservations_booked_total`, `reservations_rejected_total{reason}`).

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Latency buckets for `http_request_duration_seconds`, in seconds.
const HTTP_DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

/// Shared state for the metrics endpoint
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Install the process-wide Prometheus recorder.
///
/// Only one recorder can exist per process; a second call fails.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            HTTP_DURATION_BUCKETS,
        )?
        .install_recorder()
}

/// Recorder that is not installed globally; for tests and embedding.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

/// `GET /metrics`: Prometheus scrape endpoint
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
