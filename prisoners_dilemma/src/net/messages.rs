//! JSON messages exchanged over the WebSocket.
//!
//! Every frame is an object tagged by `type` (kebab-case) with camelCase
//! fields, e.g. `{"type":"join-room","roomId":"AB12CD"}`.

use serde::{Deserialize, Serialize};

use crate::game::{Choice, Choices, ConnectionId, RoomCode, Scores};
use crate::room::{RoomError, RoundOutcome};

/// Events a client sends to the server
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Open a new room with the sender seated
    CreateRoom,
    /// Take the second seat of an existing room
    JoinRoom {
        #[serde(alias = "sessionId")]
        room_id: RoomCode,
    },
    /// Submit a choice for the current round
    PlayerChoice {
        #[serde(alias = "sessionId")]
        room_id: RoomCode,
        player_id: ConnectionId,
        choice: Choice,
    },
}

impl ClientEvent {
    /// Parse a text frame.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Events the server sends to clients
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// First frame on every socket; tells the client its own id
    Welcome { player_id: ConnectionId },
    RoomCreated { room_id: RoomCode },
    /// Both seats taken, participants in seat order
    RoomReady { players: Vec<ConnectionId> },
    JoinError { message: String },
    RoundResult {
        choices: Choices,
        scores: Scores,
        round: u32,
    },
    GameOver { scores: Scores },
    /// The opponent's connection dropped
    PlayerDisconnected { player_id: ConnectionId },
}

impl ServerEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<RoomError> for ServerEvent {
    fn from(err: RoomError) -> Self {
        ServerEvent::JoinError {
            message: err.to_string(),
        }
    }
}

impl From<&RoundOutcome> for ServerEvent {
    fn from(outcome: &RoundOutcome) -> Self {
        ServerEvent::RoundResult {
            choices: outcome.choices.clone(),
            scores: outcome.scores.clone(),
            round: outcome.round,
        }
    }
}
