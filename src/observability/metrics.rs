//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edit_requests_total` (counter): requests by outcome
//! - `edit_request_duration_seconds` (histogram): latency distribution
//! - `edit_rate_limited_total` (counter): submissions turned away by the limiter
//! - `edit_upstream_failures_total` (counter): orchestration failures by step
//! - `edit_pull_requests_created_total` (counter)
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request with its outcome label (e.g. "created", "rate-limited").
pub fn record_request(outcome: &'static str, start: Instant) {
    metrics::counter!("edit_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("edit_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    metrics::counter!("edit_rate_limited_total").increment(1);
}

pub fn record_upstream_failure(step: &'static str) {
    metrics::counter!("edit_upstream_failures_total", "step" => step).increment(1);
}

pub fn record_pull_request_created() {
    metrics::counter!("edit_pull_requests_created_total").increment(1);
}
