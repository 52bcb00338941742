//! Per-player orb totals.
//!
//! The tally is a cache over the grid. The cascade engine keeps it in step
//! incrementally; the turn controller replaces it with a full rescan after
//! every settled turn.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::player::{Cell, Player, PLAYER_COUNT};

/// Orb count per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrbTally {
    counts: [u32; PLAYER_COUNT],
}

impl OrbTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the tally from scratch.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut counts = [0u32; PLAYER_COUNT];
        for cell in grid.cells() {
            if let Some(p) = cell.owner {
                counts[p.index()] += cell.orbs;
            }
        }
        OrbTally { counts }
    }

    pub fn get(&self, player: Player) -> u32 {
        self.counts[player.index()]
    }

    pub fn credit(&mut self, player: Player, orbs: u32) {
        self.counts[player.index()] += orbs;
    }

    /// Removes orbs from a player, saturating at zero.
    pub fn debit(&mut self, player: Player, orbs: u32) {
        let slot = &mut self.counts[player.index()];
        *slot = slot.saturating_sub(orbs);
    }

    /// Books one placed orb given the cell as it was before placement.
    pub fn record_placement(&mut self, prior: Cell, player: Player) {
        match prior.owner {
            Some(owner) if owner != player => {
                self.debit(owner, prior.orbs);
                self.credit(player, prior.orbs + 1);
            }
            _ => self.credit(player, 1),
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Player One's share of all orbs in percent; 50 on an empty board.
    pub fn dominance(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 50.0;
        }
        self.get(Player::One) as f64 * 100.0 / total as f64
    }
}
