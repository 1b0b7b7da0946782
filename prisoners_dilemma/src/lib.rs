//! # Prisoner's Dilemma
//!
//! A referee for two-player iterated prisoner's dilemma matches.
//!
//! Two connections meet in a room identified by a short code, then play a
//! fixed number of rounds. Each round both players secretly pick Cooperate or
//! Defect; once both have chosen the round is scored with the classic payoff
//! matrix and the result is broadcast to the room.
//!
//! ## Core Modules
//!
//! - [`game`]: choices, identities, room codes and the payoff matrix
//! - [`room`]: the per-room session state machine and the room store
//! - [`lobby`]: event dispatch over the store and the actor that serializes it
//! - [`net`]: JSON messages shared by server and client
//!
//! ## Example
//!
//! ```
//! use prisoners_dilemma::{Choice, ConnectionId, RoomStore};
//!
//! let mut store = RoomStore::new();
//! let (alice, bob) = (ConnectionId::new(), ConnectionId::new());
//!
//! let code = store.create(alice);
//! let session = store.get_mut(&code).unwrap();
//! session.join(bob).unwrap();
//!
//! assert!(session.submit_choice(alice, Choice::Cooperate).is_none());
//! let outcome = session.submit_choice(bob, Choice::Defect).unwrap();
//! assert_eq!(outcome.scores[&bob], 5);
//! ```

/// Game rules and shared entities.
pub mod game;
pub use game::{
    Choice, Choices, ConnectionId, RoomCode, Scores,
    constants::{self, MATCH_ROUNDS, MAX_PARTICIPANTS},
    payoff,
};

/// Sessions and the room store.
pub mod room;
pub use room::{RoomError, RoomStore, RoundOutcome, Session, SessionPhase};

/// Event dispatch and the lobby actor.
pub mod lobby;
pub use lobby::{Lobby, LobbyActor, LobbyError, LobbyHandle, LobbyMessage, LobbyStats, Outbound};

/// Client-server protocol.
pub mod net;
pub use net::messages::{self, ClientEvent, ServerEvent};
