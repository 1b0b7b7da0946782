//! Per-room session state machine.
//!
//! A [`Session`] owns the seats, the choice barrier for the current round and
//! the running scores. It never talks to the network; callers turn the
//! returned [`RoundOutcome`] into broadcasts.

use serde::Serialize;
use std::collections::HashMap;

use super::errors::{RoomError, RoomResult};
use crate::game::{
    Choice, Choices, ConnectionId, RoomCode, Scores,
    constants::{MATCH_ROUNDS, MAX_PARTICIPANTS},
    payoff,
};

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Fewer than two seats taken
    WaitingForOpponent,
    /// Both seats taken, collecting choices for the current round
    AwaitingChoices,
    /// Every round has been resolved
    Complete,
}

/// Result of resolving one round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOutcome {
    /// The round that was just played (1-based)
    pub round: u32,
    pub choices: Choices,
    /// Score snapshot after applying this round
    pub scores: Scores,
    /// True when this was the final round of the match
    pub game_over: bool,
}

/// A two-seat repeated game.
#[derive(Clone, Debug)]
pub struct Session {
    code: RoomCode,
    /// Join order; index 0 is participant 1
    participants: Vec<ConnectionId>,
    pending: HashMap<ConnectionId, Choice>,
    scores: Scores,
    /// Round about to be resolved
    round: u32,
}

impl Session {
    /// Open a session with `owner` in the first seat.
    pub fn new(code: RoomCode, owner: ConnectionId) -> Self {
        let mut scores = Scores::new();
        scores.insert(owner, 0);
        Self {
            code,
            participants: vec![owner],
            pending: HashMap::new(),
            scores,
            round: 1,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn participants(&self) -> &[ConnectionId] {
        &self.participants
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn score(&self, id: &ConnectionId) -> Option<u32> {
        self.scores.get(id).copied()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn pending_choice(&self, id: &ConnectionId) -> Option<Choice> {
        self.pending.get(id).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.participants.contains(id)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= MAX_PARTICIPANTS
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.round > MATCH_ROUNDS {
            SessionPhase::Complete
        } else if self.is_full() {
            SessionPhase::AwaitingChoices
        } else {
            SessionPhase::WaitingForOpponent
        }
    }

    /// Seat `id` as the next participant.
    ///
    /// # Errors
    ///
    /// - `RoomError::Full` if both seats are taken
    /// - `RoomError::AlreadyJoined` if `id` already holds a seat
    pub fn join(&mut self, id: ConnectionId) -> RoomResult<()> {
        if self.is_full() {
            return Err(RoomError::Full);
        }
        if self.contains(&id) {
            return Err(RoomError::AlreadyJoined);
        }

        self.participants.push(id);
        self.scores.insert(id, 0);
        Ok(())
    }

    /// Record `player`'s choice for the current round.
    ///
    /// A later submission from the same player overwrites the earlier one.
    /// Submissions from connections without a seat are ignored. Returns the
    /// outcome once both seated participants have chosen.
    pub fn submit_choice(&mut self, player: ConnectionId, choice: Choice) -> Option<RoundOutcome> {
        if !self.contains(&player) || self.phase() == SessionPhase::Complete {
            return None;
        }

        self.pending.insert(player, choice);

        let &[first, second] = self.participants.as_slice() else {
            return None;
        };
        let (Some(&first_choice), Some(&second_choice)) =
            (self.pending.get(&first), self.pending.get(&second))
        else {
            return None;
        };

        Some(self.resolve((first, first_choice), (second, second_choice)))
    }

    fn resolve(
        &mut self,
        (first, first_choice): (ConnectionId, Choice),
        (second, second_choice): (ConnectionId, Choice),
    ) -> RoundOutcome {
        let (first_delta, second_delta) = payoff(first_choice, second_choice);

        *self.scores.entry(first).or_insert(0) += first_delta;
        *self.scores.entry(second).or_insert(0) += second_delta;

        let played = self.round;
        self.pending.clear();
        self.round += 1;

        RoundOutcome {
            round: played,
            choices: Choices::from([(first, first_choice), (second, second_choice)]),
            scores: self.scores.clone(),
            game_over: self.round > MATCH_ROUNDS,
        }
    }

    /// Drop `id` from the seats, scores and pending choices.
    ///
    /// Returns false if `id` had no seat here.
    pub fn remove_participant(&mut self, id: &ConnectionId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p != id);
        if self.participants.len() == before {
            return false;
        }

        self.scores.remove(id);
        self.pending.remove(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated() -> (Session, ConnectionId, ConnectionId) {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        let mut session = Session::new(RoomCode::from("AB12CD"), a);
        session.join(b).unwrap();
        (session, a, b)
    }

    #[test]
    fn test_new_session_waits_for_opponent() {
        let a = ConnectionId::new();
        let session = Session::new(RoomCode::from("AB12CD"), a);

        assert_eq!(session.participants(), &[a]);
        assert_eq!(session.score(&a), Some(0));
        assert_eq!(session.round(), 1);
        assert_eq!(session.phase(), SessionPhase::WaitingForOpponent);
    }

    #[test]
    fn test_join_fills_second_seat() {
        let (session, a, b) = seated();

        assert_eq!(session.participants(), &[a, b]);
        assert_eq!(session.score(&b), Some(0));
        assert_eq!(session.phase(), SessionPhase::AwaitingChoices);
    }

    #[test]
    fn test_third_join_is_rejected() {
        let (mut session, a, b) = seated();

        assert_eq!(session.join(ConnectionId::new()), Err(RoomError::Full));
        assert_eq!(session.participants(), &[a, b]);
    }

    #[test]
    fn test_owner_cannot_take_both_seats() {
        let a = ConnectionId::new();
        let mut session = Session::new(RoomCode::from("AB12CD"), a);

        assert_eq!(session.join(a), Err(RoomError::AlreadyJoined));
        assert_eq!(session.participants(), &[a]);
    }

    #[test]
    fn test_single_choice_does_not_resolve() {
        let (mut session, a, _) = seated();

        assert!(session.submit_choice(a, Choice::Cooperate).is_none());
        assert_eq!(session.pending_count(), 1);
        assert_eq!(session.round(), 1);
    }

    #[test]
    fn test_resubmission_overwrites() {
        let (mut session, a, b) = seated();

        assert!(session.submit_choice(a, Choice::Cooperate).is_none());
        assert!(session.submit_choice(a, Choice::Defect).is_none());
        assert_eq!(session.pending_choice(&a), Some(Choice::Defect));

        let outcome = session.submit_choice(b, Choice::Cooperate).unwrap();
        assert_eq!(outcome.choices[&a], Choice::Defect);
        assert_eq!(outcome.scores[&a], 5);
        assert_eq!(outcome.scores[&b], 0);
    }

    #[test]
    fn test_resolution_uses_join_order() {
        let (mut session, a, b) = seated();

        // second seat chooses first
        session.submit_choice(b, Choice::Defect);
        let outcome = session.submit_choice(a, Choice::Cooperate).unwrap();

        assert_eq!(outcome.round, 1);
        assert_eq!(outcome.scores[&a], 0);
        assert_eq!(outcome.scores[&b], 5);
        assert!(!outcome.game_over);
        assert_eq!(session.round(), 2);
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_choice_from_stranger_is_ignored() {
        let (mut session, a, _) = seated();
        let stranger = ConnectionId::new();

        assert!(session.submit_choice(stranger, Choice::Defect).is_none());
        assert!(session.submit_choice(a, Choice::Defect).is_none());
        assert_eq!(session.pending_count(), 1);
        assert_eq!(session.pending_choice(&stranger), None);
    }

    #[test]
    fn test_final_round_marks_game_over() {
        let (mut session, a, b) = seated();

        for round in 1..=MATCH_ROUNDS {
            session.submit_choice(a, Choice::Defect);
            let outcome = session.submit_choice(b, Choice::Defect).unwrap();
            assert_eq!(outcome.round, round);
            assert_eq!(outcome.game_over, round == MATCH_ROUNDS);
        }

        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.score(&a), Some(MATCH_ROUNDS));
        assert!(session.submit_choice(a, Choice::Defect).is_none());
    }

    #[test]
    fn test_remove_participant_clears_entries() {
        let (mut session, a, b) = seated();
        session.submit_choice(b, Choice::Cooperate);

        assert!(session.remove_participant(&b));
        assert_eq!(session.participants(), &[a]);
        assert_eq!(session.score(&b), None);
        assert_eq!(session.pending_choice(&b), None);
        assert_eq!(session.phase(), SessionPhase::WaitingForOpponent);

        assert!(!session.remove_participant(&b));
        assert!(session.remove_participant(&a));
        assert!(session.is_empty());
    }
}
