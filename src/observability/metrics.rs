//! Metrics collection and exposition.
//!
//! # Metrics
//! - `staking_actions_total` (counter): settled actions by kind, outcome
//! - `staking_rpc_failures_total` (counter): reads/submissions that failed on every provider
//! - `staking_wallet_events_total` (counter): wallet change events by kind

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_action(kind: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("staking_actions_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_rpc_failure(op: &'static str) {
    metrics::counter!("staking_rpc_failures_total", "op" => op).increment(1);
}

pub fn record_wallet_event(kind: &'static str) {
    metrics::counter!("staking_wallet_events_total", "kind" => kind).increment(1);
}
