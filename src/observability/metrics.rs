//! Metrics collection and exposition.
//!
//! # Metrics
//! - `diploma_issuance_total` (counter): issuance attempts by outcome
//! - `diploma_issuance_duration_seconds` (histogram): submit-to-receipt time
//! - `diploma_balance_queries_total` (counter): balance lookups by result
//! - `diploma_rpc_reachable` (gauge): 1=reachable, 0=unreachable
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_issuance(outcome: &'static str) {
    metrics::counter!("diploma_issuance_total", "outcome" => outcome).increment(1);
}

pub fn record_issuance_latency(started: Instant) {
    metrics::histogram!("diploma_issuance_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_balance_query(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!("diploma_balance_queries_total", "result" => result).increment(1);
}

pub fn record_rpc_reachable(reachable: bool) {
    metrics::gauge!("diploma_rpc_reachable").set(if reachable { 1.0 } else { 0.0 });
}
