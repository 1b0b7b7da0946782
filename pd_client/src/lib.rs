//! Internal modules for the prisoner's dilemma client.
//!
//! Command parsing and the WebSocket session used by the pd_client binary.

pub mod commands;
pub mod websocket_client;
