//! Legal move generation.
//!
//! A player may place on any empty cell or on a cell they already own.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Coord, Grid, Player};

/// A placement target.
pub type Move = Coord;

/// Returns true if `player` may place an orb at `coord`.
pub fn is_legal(grid: &Grid, player: Player, coord: Coord) -> bool {
    grid.get(coord).is_some_and(|cell| cell.accepts(player))
}

/// All legal placements for `player`, in row-major order.
pub fn legal_moves(grid: &Grid, player: Player) -> Vec<Move> {
    grid.coords()
        .zip(grid.cells())
        .filter(|(_, cell)| cell.accepts(player))
        .map(|(coord, _)| coord)
        .collect()
}

/// Returns true if `player` has at least one legal placement.
pub fn has_legal_move(grid: &Grid, player: Player) -> bool {
    grid.cells().iter().any(|cell| cell.accepts(player))
}

/// Picks a uniformly random legal placement, or `None` if there is none.
pub fn random_move(grid: &Grid, player: Player, rng: &mut impl Rng) -> Option<Move> {
    legal_moves(grid, player).choose(rng).copied()
}
