//! Core entities shared by the referee and the wire protocol.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

use super::constants::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN};

/// A participant's selection for a single round.
///
/// On the wire a choice is the single letter `"C"` or `"D"`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Choice {
    #[serde(rename = "C", alias = "cooperate", alias = "Cooperate")]
    Cooperate,
    #[serde(rename = "D", alias = "defect", alias = "Defect")]
    Defect,
}

impl Choice {
    pub const ALL: [Choice; 2] = [Choice::Cooperate, Choice::Defect];
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Cooperate => write!(f, "C"),
            Choice::Defect => write!(f, "D"),
        }
    }
}

#[derive(Debug, Eq, Error, PartialEq)]
#[error("unknown choice '{0}', expected C or D")]
pub struct ParseChoiceError(pub String);

impl FromStr for Choice {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "cooperate" => Ok(Choice::Cooperate),
            "d" | "defect" => Ok(Choice::Defect),
            other => Err(ParseChoiceError(other.to_string())),
        }
    }
}

/// Transport-level identity of one connection.
///
/// Assigned by the server when a socket is accepted and used as the
/// participant id everywhere else.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short human-typeable room identifier.
///
/// Every construction path trims and upper-cases, so lookups are
/// case-insensitive for whoever typed the code.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Draw a fresh code from the base-36 alphabet.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RoomCode {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<&str> for RoomCode {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<RoomCode> for String {
    fn from(value: RoomCode) -> Self {
        value.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Running totals keyed by participant.
pub type Scores = BTreeMap<ConnectionId, u32>;

/// The choices that made up one resolved round.
pub type Choices = BTreeMap<ConnectionId, Choice>;
