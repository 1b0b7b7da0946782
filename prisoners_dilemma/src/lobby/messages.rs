//! Lobby actor message types.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::{
    game::ConnectionId,
    net::messages::{ClientEvent, ServerEvent},
};

/// Messages that can be sent to the LobbyActor
#[derive(Debug)]
pub enum LobbyMessage {
    /// A socket was accepted; `sender` carries its outbound events
    Connect {
        connection_id: ConnectionId,
        sender: mpsc::Sender<ServerEvent>,
    },

    /// A parsed client frame
    Event {
        connection_id: ConnectionId,
        event: ClientEvent,
    },

    /// The socket closed or errored
    Disconnect { connection_id: ConnectionId },

    /// Snapshot counters for health reporting
    GetStats {
        response: oneshot::Sender<LobbyStats>,
    },
}

/// Lobby counters
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LobbyStats {
    /// Live rooms
    pub rooms: usize,

    /// Registered connections
    pub connections: usize,
}

/// Errors talking to the lobby actor
#[derive(Debug, Error)]
pub enum LobbyError {
    #[error("lobby is closed")]
    Closed,

    #[error("lobby dropped the response")]
    NoResponse(#[from] oneshot::error::RecvError),
}
