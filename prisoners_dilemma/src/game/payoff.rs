//! The fixed prisoner's dilemma payoff matrix.

use super::entities::Choice;

/// Mutual cooperation.
pub const REWARD: u32 = 3;
/// Defecting against a cooperator.
pub const TEMPTATION: u32 = 5;
/// Cooperating against a defector.
pub const SUCKER: u32 = 0;
/// Mutual defection.
pub const PUNISHMENT: u32 = 1;

/// Point deltas for participant 1 and participant 2, in that order.
pub fn payoff(first: Choice, second: Choice) -> (u32, u32) {
    match (first, second) {
        (Choice::Cooperate, Choice::Cooperate) => (REWARD, REWARD),
        (Choice::Cooperate, Choice::Defect) => (SUCKER, TEMPTATION),
        (Choice::Defect, Choice::Cooperate) => (TEMPTATION, SUCKER),
        (Choice::Defect, Choice::Defect) => (PUNISHMENT, PUNISHMENT),
    }
}
