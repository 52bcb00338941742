//! AI move selection.
//!
//! Three tiers share a single entry point, [`select_move`], dispatched on
//! [`Difficulty`]. Every tier reads the live grid without mutating it; the
//! hard tier simulates candidates on private clones.

pub mod easy;
pub mod lookahead;
pub mod medium;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Grid, OrbTally, Player};
use crate::movegen::Move;

pub use lookahead::{evaluate_move, evaluate_moves, ScoredMove};
pub use medium::rank_moves;

/// AI strength tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Error returned when parsing an unknown difficulty name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
pub struct UnknownDifficulty(pub String);

impl Difficulty {
    /// Returns the lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Returns the uppercase initial used in short labels.
    pub const fn initial(self) -> char {
        match self {
            Difficulty::Easy => 'E',
            Difficulty::Medium => 'M',
            Difficulty::Hard => 'H',
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

/// Tuning for the easy tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasyParams {
    /// Chance of a uniformly random move.
    pub random_chance: f64,
    /// Chance of taking a detonating move when one exists.
    pub detonate_chance: f64,
}

impl Default for EasyParams {
    fn default() -> Self {
        EasyParams {
            random_chance: 0.6,
            detonate_chance: 0.7,
        }
    }
}

/// Tuning for the medium tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediumParams {
    /// Chance of a uniformly random move.
    pub random_chance: f64,
    /// Chance of the top-ranked move.
    pub best_chance: f64,
    /// Chance of the second-ranked move; the remainder goes to the third.
    pub second_chance: f64,
}

impl Default for MediumParams {
    fn default() -> Self {
        MediumParams {
            random_chance: 0.15,
            best_chance: 0.7,
            second_chance: 0.2,
        }
    }
}

/// Tuning for the hard tier.
///
/// The randomisation keeps play from being fully predictable; none of the
/// values matter for correctness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookaheadParams {
    /// Chance of playing the runner-up.
    pub second_best_chance: f64,
    /// Chance of picking uniformly among near-best moves.
    pub near_best_chance: f64,
    /// Score distance from the best that still counts as near-best.
    pub near_best_margin: i64,
    /// Evaluate candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for LookaheadParams {
    fn default() -> Self {
        LookaheadParams {
            second_best_chance: 0.05,
            near_best_chance: 0.15,
            near_best_margin: 5,
            parallel: true,
        }
    }
}

/// Tuning for all tiers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrategyParams {
    pub easy: EasyParams,
    pub medium: MediumParams,
    pub hard: LookaheadParams,
}

/// Chooses a move for `player` at the given difficulty.
///
/// Returns `None` only when `player` has no legal move.
pub fn select_move(
    grid: &Grid,
    tally: &OrbTally,
    player: Player,
    difficulty: Difficulty,
    params: &StrategyParams,
    rng: &mut impl Rng,
) -> Option<Move> {
    match difficulty {
        Difficulty::Easy => easy::select(grid, player, &params.easy, rng),
        Difficulty::Medium => medium::select(grid, player, &params.medium, rng),
        Difficulty::Hard => lookahead::select(grid, tally, player, &params.hard, rng),
    }
}
