//! Networking layer shared by the server and the client.
//!
//! The transport itself lives in the server binary; this module only
//! defines the JSON messages both sides agree on.

/// Message types for the client-server protocol.
pub mod messages;
