//! Room bookkeeping: sessions and the table that owns them.

pub mod errors;
pub mod session;
pub mod store;

pub use errors::{RoomError, RoomResult};
pub use session::{RoundOutcome, Session, SessionPhase};
pub use store::RoomStore;
