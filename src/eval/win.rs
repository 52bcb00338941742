//! Win detection.
//!
//! A player wins once the opponent has no presence left on the grid. The
//! check is skipped for the opening placements, before both players have
//! had a chance to place.

use crate::board::{Grid, Player, ALL_PLAYERS, PLAYER_COUNT};

/// Turn count after which presence is decisive.
pub const OPENING_TURNS: u32 = 1;

/// Orbs and cells held by each player, from a full grid scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presence {
    pub orbs: [u32; PLAYER_COUNT],
    pub cells: [usize; PLAYER_COUNT],
}

impl Presence {
    pub fn scan(grid: &Grid) -> Self {
        let mut presence = Presence::default();
        for cell in grid.cells() {
            if let Some(p) = cell.owner {
                presence.orbs[p.index()] += cell.orbs;
                presence.cells[p.index()] += 1;
            }
        }
        presence
    }

    /// Returns true if `player` holds any orb or cell.
    pub fn is_present(&self, player: Player) -> bool {
        self.orbs[player.index()] > 0 || self.cells[player.index()] > 0
    }
}

/// Returns the winner, if exactly one player is still present.
///
/// `turn_count` is the number of placements made so far in the match.
pub fn winner(grid: &Grid, turn_count: u32) -> Option<Player> {
    if turn_count <= OPENING_TURNS {
        return None;
    }
    let presence = Presence::scan(grid);
    let mut present = ALL_PLAYERS.iter().filter(|p| presence.is_present(**p));
    match (present.next(), present.next()) {
        (Some(&p), None) => Some(p),
        _ => None,
    }
}
