//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by route, status
//! - `edge_request_duration_seconds` (histogram): time to response head, by route
//! - `edge_upstream_fetch_total` (counter): upstream fetches by kind, outcome
//! - `edge_stream_aborts_total` (counter): page bodies cut short by an error
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter serves its own listener, apart from the site

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    counter!("edge_requests_total", "route" => route.to_string(), "status" => status.to_string())
        .increment(1);
    histogram!("edge_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream fetch. `outcome` is `ok`, `status` or `error`.
pub fn record_upstream_fetch(kind: &'static str, outcome: &'static str) {
    counter!("edge_upstream_fetch_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_stream_abort() {
    counter!("edge_stream_aborts_total").increment(1);
}
