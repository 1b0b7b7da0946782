//! Structured logging configuration.
//!
//! The library logs through the `log` facade; the subscriber installed here
//! picks those records up alongside native `tracing` events.

use prisoners_dilemma::ConnectionId;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info` with HTTP plumbing turned down.
///
/// # Example
///
/// ```no_run
/// use pd_server::logging;
///
/// logging::init();
/// tracing::info!("Server starting");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a connection lifecycle event with structured data
///
/// # Arguments
///
/// * `event_type` - Short event name (`connected`, `rate_limited`, ...)
/// * `connection_id` - Connection the event concerns
/// * `message` - Event message
pub fn log_connection_event(event_type: &str, connection_id: &ConnectionId, message: &str) {
    match event_type {
        "rate_limited" | "invalid_frame" => tracing::warn!(
            event_type = event_type,
            connection_id = %connection_id,
            "CONNECTION: {}",
            message
        ),
        _ => tracing::info!(
            event_type = event_type,
            connection_id = %connection_id,
            "CONNECTION: {}",
            message
        ),
    }
}
