//! In-memory room table.

use rand::{SeedableRng, rngs::StdRng};
use std::collections::HashMap;

use super::session::Session;
use crate::game::{ConnectionId, RoomCode};

/// Mapping from room code to session, scoped to the process lifetime.
#[derive(Debug)]
pub struct RoomStore {
    rooms: HashMap<RoomCode, Session>,
    rng: StdRng,
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomStore {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Store with a reproducible code sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rooms: HashMap::new(),
            rng,
        }
    }

    /// Open a room with `owner` seated and return its code.
    ///
    /// Codes are redrawn while they collide with a live room.
    pub fn create(&mut self, owner: ConnectionId) -> RoomCode {
        let code = loop {
            let candidate = RoomCode::random(&mut self.rng);
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        self.rooms
            .insert(code.clone(), Session::new(code.clone(), owner));
        code
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Session> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Session> {
        self.rooms.get_mut(code)
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Remove a room. Removing an unknown code is a no-op.
    pub fn remove(&mut self, code: &RoomCode) -> Option<Session> {
        self.rooms.remove(code)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Codes of every room `id` holds a seat in.
    pub fn rooms_of(&self, id: &ConnectionId) -> Vec<RoomCode> {
        self.rooms
            .values()
            .filter(|session| session.contains(id))
            .map(|session| session.code().clone())
            .collect()
    }
}
