//! Lobby actor: one task, one inbox, every room.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};

use super::{
    Lobby, Outbound,
    messages::{LobbyError, LobbyMessage, LobbyStats},
};
use crate::{
    game::ConnectionId,
    net::messages::{ClientEvent, ServerEvent},
    room::RoomStore,
};

/// Default inbox depth
pub const DEFAULT_INBOX_CAPACITY: usize = 256;

/// Cloneable handle for sending messages to the lobby
#[derive(Clone, Debug)]
pub struct LobbyHandle {
    sender: mpsc::Sender<LobbyMessage>,
}

impl LobbyHandle {
    pub fn new(sender: mpsc::Sender<LobbyMessage>) -> Self {
        Self { sender }
    }

    /// Send a raw message to the lobby
    pub async fn send(&self, message: LobbyMessage) -> Result<(), LobbyError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| LobbyError::Closed)
    }

    /// Register a connection and its outbound channel.
    ///
    /// The lobby answers with a `welcome` event on `sender`.
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::Sender<ServerEvent>,
    ) -> Result<(), LobbyError> {
        self.send(LobbyMessage::Connect {
            connection_id,
            sender,
        })
        .await
    }

    pub async fn dispatch(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), LobbyError> {
        self.send(LobbyMessage::Event {
            connection_id,
            event,
        })
        .await
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), LobbyError> {
        self.send(LobbyMessage::Disconnect { connection_id }).await
    }

    pub async fn stats(&self) -> Result<LobbyStats, LobbyError> {
        let (tx, rx) = oneshot::channel();
        self.send(LobbyMessage::GetStats { response: tx }).await?;
        Ok(rx.await?)
    }
}

/// Actor owning the [`Lobby`] and the outbound channel of every connection.
///
/// Messages are handled strictly one at a time, which is what makes each
/// create/join/choice/disconnect transition atomic.
pub struct LobbyActor {
    lobby: Lobby,

    /// Message inbox
    inbox: mpsc::Receiver<LobbyMessage>,

    /// Outbound channel per live connection
    connections: HashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
}

impl LobbyActor {
    /// Create a new lobby actor
    ///
    /// # Arguments
    ///
    /// * `store` - Room store the lobby takes ownership of
    /// * `inbox_capacity` - Depth of the message inbox
    ///
    /// # Returns
    ///
    /// * `(LobbyActor, LobbyHandle)` - Actor and handle for sending messages
    pub fn new(store: RoomStore, inbox_capacity: usize) -> (Self, LobbyHandle) {
        let (sender, inbox) = mpsc::channel(inbox_capacity);

        let actor = Self {
            lobby: Lobby::new(store),
            inbox,
            connections: HashMap::new(),
        };

        (actor, LobbyHandle::new(sender))
    }

    /// Spawn the actor on the current runtime and return its handle
    pub fn spawn(store: RoomStore, inbox_capacity: usize) -> LobbyHandle {
        let (actor, handle) = Self::new(store, inbox_capacity);
        tokio::spawn(actor.run());
        handle
    }

    /// Run until every handle has been dropped
    pub async fn run(mut self) {
        log::info!("Lobby starting");

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
        }

        log::info!(
            "Lobby stopped with {} room(s) still open",
            self.lobby.store().len()
        );
    }

    fn handle_message(&mut self, message: LobbyMessage) {
        match message {
            LobbyMessage::Connect {
                connection_id,
                sender,
            } => {
                self.connections.insert(connection_id, sender);
                log::debug!("Connection {} registered", connection_id);
                self.deliver(vec![Outbound::to(
                    connection_id,
                    ServerEvent::Welcome {
                        player_id: connection_id,
                    },
                )]);
            }

            LobbyMessage::Event {
                connection_id,
                event,
            } => {
                let out = self.lobby.handle(connection_id, event);
                self.deliver(out);
            }

            LobbyMessage::Disconnect { connection_id } => {
                self.connections.remove(&connection_id);
                let out = self.lobby.disconnect(connection_id);
                self.deliver(out);
                log::debug!("Connection {} unregistered", connection_id);
            }

            LobbyMessage::GetStats { response } => {
                let _ = response.send(LobbyStats {
                    rooms: self.lobby.store().len(),
                    connections: self.connections.len(),
                });
            }
        }
    }

    /// Fire-and-forget delivery to each recipient's channel
    fn deliver(&self, outbound: Vec<Outbound>) {
        for Outbound { recipients, event } in outbound {
            for recipient in recipients {
                let Some(sender) = self.connections.get(&recipient) else {
                    log::debug!("No channel for {}, dropping {:?}", recipient, event);
                    continue;
                };

                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        log::warn!("Connection {} channel full, dropping event", recipient);
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        // Its Disconnect is already queued behind us
                        log::debug!("Connection {} channel closed", recipient);
                    }
                }
            }
        }
    }
}
