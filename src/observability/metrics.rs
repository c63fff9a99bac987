//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_operations_total` (counter): ledger operations by op, outcome
//! - `gateway_chain_calls_total` (counter): RPC calls by op, outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed HTTP request.
pub fn record_request(route: &str, status: u16, start_time: Instant) {
    let route = route.to_string();
    ::metrics::counter!(
        "gateway_requests_total",
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record the outcome of a ledger operation. `outcome` is `ok` or an error kind.
pub fn record_operation(op: &'static str, outcome: &'static str) {
    ::metrics::counter!("gateway_operations_total", "op" => op, "outcome" => outcome).increment(1);
}

/// Record one RPC call against the chain.
pub fn record_chain_call(op: &'static str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    ::metrics::counter!("gateway_chain_calls_total", "op" => op, "outcome" => outcome).increment(1);
}
