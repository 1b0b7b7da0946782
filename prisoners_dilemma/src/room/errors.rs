//! Admission-control errors.

use thiserror::Error;

/// Why a join request was refused. Only ever reported to the requester.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum RoomError {
    #[error("Room not found")]
    NotFound,

    #[error("Room is full")]
    Full,

    /// The connection already holds a seat in this room
    #[error("Already in this room")]
    AlreadyJoined,
}

pub type RoomResult<T> = std::result::Result<T, RoomError>;
