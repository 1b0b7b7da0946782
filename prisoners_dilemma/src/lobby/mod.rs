//! Lobby: the single owner of every room.
//!
//! [`Lobby`] turns inbound connection events into room-store mutations and
//! returns the outbound events they produce. It is synchronous and never
//! blocks, so running it inside one task (see [`LobbyActor`]) makes every
//! transition atomic with respect to every other.
//!
//! ## Example
//!
//! ```
//! use prisoners_dilemma::{ConnectionId, Lobby, RoomStore, ServerEvent};
//!
//! let mut lobby = Lobby::new(RoomStore::new());
//! let alice = ConnectionId::new();
//!
//! let out = lobby.create_room(alice);
//! assert!(matches!(out[0].event, ServerEvent::RoomCreated { .. }));
//! assert_eq!(out[0].recipients, vec![alice]);
//! ```

pub mod actor;
pub mod messages;

pub use actor::{LobbyActor, LobbyHandle};
pub use messages::{LobbyError, LobbyMessage, LobbyStats};

use log::{debug, info};

use crate::{
    game::{Choice, ConnectionId, RoomCode},
    net::messages::{ClientEvent, ServerEvent},
    room::{RoomError, RoomStore},
};

/// An event and the connections it must reach.
#[derive(Clone, Debug, PartialEq)]
pub struct Outbound {
    pub recipients: Vec<ConnectionId>,
    pub event: ServerEvent,
}

impl Outbound {
    fn to(recipient: ConnectionId, event: ServerEvent) -> Self {
        Self {
            recipients: vec![recipient],
            event,
        }
    }

    fn broadcast(recipients: &[ConnectionId], event: ServerEvent) -> Self {
        Self {
            recipients: recipients.to_vec(),
            event,
        }
    }
}

/// Session state machine over a [`RoomStore`].
#[derive(Debug, Default)]
pub struct Lobby {
    store: RoomStore,
}

impl Lobby {
    pub fn new(store: RoomStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    /// Dispatch a client event sent by `from`.
    pub fn handle(&mut self, from: ConnectionId, event: ClientEvent) -> Vec<Outbound> {
        match event {
            ClientEvent::CreateRoom => self.create_room(from),
            ClientEvent::JoinRoom { room_id } => self.join_room(from, &room_id),
            ClientEvent::PlayerChoice {
                room_id,
                player_id,
                choice,
            } => {
                if player_id != from {
                    debug!("Connection {} submitted a choice for {}", from, player_id);
                }
                self.submit_choice(&room_id, player_id, choice)
            }
        }
    }

    /// Open a room with `from` in the first seat.
    pub fn create_room(&mut self, from: ConnectionId) -> Vec<Outbound> {
        let room_id = self.store.create(from);
        info!("Room {} created by {}", room_id, from);

        vec![Outbound::to(from, ServerEvent::RoomCreated { room_id })]
    }

    /// Seat `from` in an existing room.
    ///
    /// Rejections go back to `from` only; success is broadcast to both seats.
    pub fn join_room(&mut self, from: ConnectionId, room_id: &RoomCode) -> Vec<Outbound> {
        let result = match self.store.get_mut(room_id) {
            Some(session) => session
                .join(from)
                .map(|()| session.participants().to_vec()),
            None => Err(RoomError::NotFound),
        };

        match result {
            Ok(players) => {
                info!("{} joined room {} ({} players)", from, room_id, players.len());
                vec![Outbound::broadcast(
                    &players,
                    ServerEvent::RoomReady {
                        players: players.clone(),
                    },
                )]
            }
            Err(err) => {
                debug!("Join of room {} by {} refused: {}", room_id, from, err);
                vec![Outbound::to(from, err.into())]
            }
        }
    }

    /// Record a choice and resolve the round once both seats have chosen.
    ///
    /// Unknown rooms and unseated players are ignored.
    pub fn submit_choice(
        &mut self,
        room_id: &RoomCode,
        player: ConnectionId,
        choice: Choice,
    ) -> Vec<Outbound> {
        let Some(session) = self.store.get_mut(room_id) else {
            debug!("Choice for unknown room {} ignored", room_id);
            return Vec::new();
        };

        let Some(outcome) = session.submit_choice(player, choice) else {
            return Vec::new();
        };

        let players = session.participants().to_vec();
        info!(
            "Room {} round {} resolved: {:?}",
            room_id, outcome.round, outcome.scores
        );

        let mut out = vec![Outbound::broadcast(&players, (&outcome).into())];

        if outcome.game_over {
            out.push(Outbound::broadcast(
                &players,
                ServerEvent::GameOver {
                    scores: outcome.scores,
                },
            ));
            self.store.remove(room_id);
            info!("Room {} finished and removed", room_id);
        }

        out
    }

    /// Remove `conn` from every room it sits in.
    ///
    /// Rooms left empty are destroyed; a remaining participant is told its
    /// opponent is gone and keeps the room.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        let mut out = Vec::new();

        for room_id in self.store.rooms_of(&conn) {
            let Some(session) = self.store.get_mut(&room_id) else {
                continue;
            };
            session.remove_participant(&conn);
            info!(
                "{} left room {}, {} player(s) remain",
                conn,
                room_id,
                session.participants().len()
            );

            if session.is_empty() {
                self.store.remove(&room_id);
                info!("Removed empty room {}", room_id);
            } else {
                out.push(Outbound::broadcast(
                    session.participants(),
                    ServerEvent::PlayerDisconnected { player_id: conn },
                ));
            }
        }

        out
    }
}
