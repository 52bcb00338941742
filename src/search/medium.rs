//! Medium tier: static heuristic ranking with a little noise.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Grid, Player};
use crate::eval::score_placement;
use crate::movegen::{legal_moves, Move};

use super::MediumParams;

/// Scores every legal move and sorts best first. Ties keep row-major order.
pub fn rank_moves(grid: &Grid, player: Player) -> Vec<(Move, f32)> {
    let mut ranked: Vec<(Move, f32)> = legal_moves(grid, player)
        .into_iter()
        .map(|mv| (mv, score_placement(grid, player, mv)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Picks a move for the medium tier.
pub fn select(
    grid: &Grid,
    player: Player,
    params: &MediumParams,
    rng: &mut impl Rng,
) -> Option<Move> {
    if rng.gen::<f64>() < params.random_chance {
        return legal_moves(grid, player).choose(rng).copied();
    }

    let ranked = rank_moves(grid, player);
    if ranked.is_empty() {
        return None;
    }
    let roll = rng.gen::<f64>();
    let rank = if roll < params.best_chance || ranked.len() <= 1 {
        0
    } else if roll < params.best_chance + params.second_chance {
        1
    } else if ranked.len() >= 3 {
        2
    } else {
        0
    };
    Some(ranked[rank].0)
}
