//! Metrics collection and exposition.
//!
//! # Metrics
//! - `front_requests_total` (counter): requests by method, status, controller
//! - `front_request_duration_seconds` (histogram): latency distribution
//! - `front_route_misses_total` (counter): paths no route matched
//! - `front_logins_total` (counter): login attempts by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter serves its own HTTP endpoint

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(method: &str, status: u16, controller: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("controller", controller.to_string()),
    ];
    counter!("front_requests_total", &labels).increment(1);
    histogram!("front_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

pub fn record_route_miss() {
    counter!("front_route_misses_total").increment(1);
}

pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("front_logins_total", "outcome" => outcome).increment(1);
}
