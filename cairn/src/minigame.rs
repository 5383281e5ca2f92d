//! Rock-paper-scissors adjudication shared by lockpicking and battle.

use rand::{Rng, RngExt};

use crate::entity::StatKind;

/// One throw of the minigame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Throw {
    Rock,
    Paper,
    Scissors,
}

impl Throw {
    pub const ALL: [Throw; 3] = [Throw::Rock, Throw::Paper, Throw::Scissors];

    /// The throw this one defeats.
    pub fn beats(self) -> Throw {
        match self {
            Throw::Rock => Throw::Scissors,
            Throw::Paper => Throw::Rock,
            Throw::Scissors => Throw::Paper,
        }
    }

    /// Damage type carried by the throw.
    pub fn stat(self) -> StatKind {
        match self {
            Throw::Rock => StatKind::Physical,
            Throw::Paper => StatKind::Ranged,
            Throw::Scissors => StatKind::Magical,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Throw::Rock => "rock",
            Throw::Paper => "paper",
            Throw::Scissors => "scissors",
        }
    }

    /// A uniformly random throw.
    pub fn random(rng: &mut impl Rng) -> Throw {
        Throw::ALL[rng.random_range(0..Throw::ALL.len())]
    }
}

/// Result of a round from the acting side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Tie,
    Lose,
}

/// Adjudicate `mine` against `theirs`.
pub fn resolve_against(mine: Throw, theirs: Throw) -> Outcome {
    if mine == theirs {
        Outcome::Tie
    } else if mine.beats() == theirs {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

/// Play `mine` against a uniformly drawn opponent throw. Returns the outcome
/// and the throw the opponent made.
pub fn resolve(mine: Throw, rng: &mut impl Rng) -> (Outcome, Throw) {
    let theirs = Throw::random(rng);
    (resolve_against(mine, theirs), theirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn each_throw_beats_exactly_one() {
        for t in Throw::ALL {
            let wins = Throw::ALL
                .iter()
                .filter(|&&o| resolve_against(t, o) == Outcome::Win)
                .count();
            let losses = Throw::ALL
                .iter()
                .filter(|&&o| resolve_against(t, o) == Outcome::Lose)
                .count();
            assert_eq!((wins, losses), (1, 1), "{t:?}");
        }
    }

    #[test]
    fn outcome_is_antisymmetric() {
        for a in Throw::ALL {
            for b in Throw::ALL {
                let flipped = match resolve_against(b, a) {
                    Outcome::Win => Outcome::Lose,
                    Outcome::Lose => Outcome::Win,
                    Outcome::Tie => Outcome::Tie,
                };
                assert_eq!(resolve_against(a, b), flipped);
            }
        }
    }

    #[test]
    fn resolve_reports_opponent_throw() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let (outcome, theirs) = resolve(Throw::Paper, &mut rng);
            assert_eq!(outcome, resolve_against(Throw::Paper, theirs));
        }
    }
}
