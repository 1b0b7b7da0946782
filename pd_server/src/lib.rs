//! Prisoner's dilemma match server library.
//!
//! Exposes the router, configuration and observability setup so the binary
//! and the integration tests build the server the same way.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
