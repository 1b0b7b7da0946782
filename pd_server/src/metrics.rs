//! Prometheus metrics for monitoring server health.
//!
//! Metrics are exposed in Prometheus text format when `METRICS_BIND` is set.
//! Without an installed exporter the recording calls are no-ops.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use pd_server::metrics;
//!
//! metrics::init_metrics("127.0.0.1:9090".parse().unwrap()).unwrap();
//! metrics::websocket_connection_opened();
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// WebSocket Metrics
// ============================================================================

pub fn websocket_connection_opened() {
    metrics::gauge!("websocket_connections_active").increment(1.0);
    metrics::counter!("websocket_connections_total").increment(1);
}

pub fn websocket_connection_closed() {
    metrics::gauge!("websocket_connections_active").decrement(1.0);
}

/// Record an inbound frame by outcome (`accepted`, `invalid`, `rate_limited`).
pub fn websocket_message_received(outcome: &'static str) {
    metrics::counter!("websocket_messages_received_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// Lobby Metrics
// ============================================================================

/// Set the live room gauge.
pub fn rooms_active(count: usize) {
    metrics::gauge!("rooms_active").set(count as f64);
}
