//! Easy tier: mostly random play with a taste for explosions.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Grid, Player};
use crate::eval::is_exposed;
use crate::movegen::{legal_moves, Move};

use super::EasyParams;

/// Picks a move for the easy tier.
///
/// With `random_chance` the move is uniformly random. Otherwise a detonating
/// move is preferred (taken with `detonate_chance` when one exists), then a
/// move not adjacent to an opponent cell about to detonate, then anything.
pub fn select(grid: &Grid, player: Player, params: &EasyParams, rng: &mut impl Rng) -> Option<Move> {
    let moves = legal_moves(grid, player);
    if moves.is_empty() {
        return None;
    }
    if rng.gen::<f64>() < params.random_chance {
        return moves.choose(rng).copied();
    }

    let detonating: Vec<Move> = moves
        .iter()
        .copied()
        .filter(|&mv| grid.is_critical(mv))
        .collect();
    if !detonating.is_empty() && rng.gen::<f64>() < params.detonate_chance {
        return detonating.choose(rng).copied();
    }

    let safe: Vec<Move> = moves
        .iter()
        .copied()
        .filter(|&mv| !is_exposed(grid, player, mv))
        .collect();
    if let Some(&mv) = safe.choose(rng) {
        return Some(mv);
    }

    moves.choose(rng).copied()
}
