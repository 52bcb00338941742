//! Per-match state owned by the turn controller.

use crate::board::{Grid, GridError, OrbTally, Player};
use crate::search::Difficulty;

use super::config::{MatchConfig, Mode};

/// Complete state of one match.
///
/// Owned exclusively by the turn controller; everything else sees it
/// through a shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub grid: Grid,
    pub tally: OrbTally,
    pub current_player: Player,
    /// Placements made so far, counting AI placements.
    pub turn_count: u32,
    pub game_over: bool,
    pub winner: Option<Player>,
    pub mode: Mode,
    pub difficulty: Difficulty,
    /// A placement and its cascade are being resolved.
    pub turn_in_progress: bool,
    /// The AI is choosing its move.
    pub ai_thinking: bool,
}

impl MatchState {
    /// Creates a fresh match on an empty grid with Player One to move.
    pub fn new(config: &MatchConfig) -> Result<Self, GridError> {
        Ok(MatchState {
            grid: Grid::new(config.rows, config.cols)?,
            tally: OrbTally::new(),
            current_player: Player::One,
            turn_count: 0,
            game_over: false,
            winner: None,
            mode: config.mode,
            difficulty: config.difficulty,
            turn_in_progress: false,
            ai_thinking: false,
        })
    }

    /// Returns true while a placement or AI move is being resolved.
    pub fn is_busy(&self) -> bool {
        self.turn_in_progress || self.ai_thinking
    }
}
