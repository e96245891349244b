//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by outcome, status
//! - `edge_request_duration_seconds` (histogram): time to response headers by outcome
//! - `edge_presign_duration_seconds` (histogram): backend exchange latency by result
//! - `edge_origin_fetches_total` (counter): origin fetches by kind, status
//!
//! # Design Decisions
//! - `metrics` facade; calls are no-ops until an exporter is installed
//! - Prometheus exporter serves its own listener, separate from client traffic

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            metrics::describe_counter!("edge_requests_total", "Client requests by outcome");
            metrics::describe_histogram!(
                "edge_request_duration_seconds",
                "Time until response headers were ready"
            );
            metrics::describe_histogram!(
                "edge_presign_duration_seconds",
                "Latency of the backend presign exchange"
            );
            metrics::describe_counter!("edge_origin_fetches_total", "Origin fetches by kind");
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
        }
    }
}

pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "edge_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("edge_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_presign(result: &'static str, start: Instant) {
    metrics::histogram!("edge_presign_duration_seconds", "result" => result)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_origin_fetch(kind: &'static str, status: u16) {
    metrics::counter!(
        "edge_origin_fetches_total",
        "kind" => kind,
        "status" => status.to_string()
    )
    .increment(1);
}
