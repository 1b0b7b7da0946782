//! Game rules: choices, identities and the payoff matrix.
//!
//! Everything in here is pure data and pure functions. Room bookkeeping lives
//! in [`crate::room`].

pub mod constants;
pub mod entities;
pub mod payoff;

pub use entities::{Choice, Choices, ConnectionId, ParseChoiceError, RoomCode, Scores};
pub use payoff::payoff;
