//! Hard tier: one-ply lookahead over every legal move.
//!
//! Each candidate is played on a private clone of the grid and tally, the
//! cascade is resolved silently, and the settled position is scored. The
//! candidates share nothing mutable, so they are evaluated on the rayon
//! pool and joined before a move is picked.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::board::{Grid, OrbTally, Player};
use crate::cascade::run_cascade;
use crate::eval::score_position;
use crate::movegen::{legal_moves, Move};

use super::LookaheadParams;

/// A candidate move with its lookahead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i64,
}

/// Plays `mv` on a copy of the position and scores the settled result.
pub fn evaluate_move(grid: &Grid, tally: &OrbTally, player: Player, mv: Move) -> i64 {
    let mut scratch = grid.clone();
    let mut scratch_tally = *tally;
    let prior = scratch.place_orb(mv, player);
    scratch_tally.record_placement(prior, player);
    run_cascade(&mut scratch, &mut scratch_tally, mv, player, None);
    score_position(&scratch, player)
}

/// Scores all legal moves, best first. Ties keep row-major order, so the
/// parallel and sequential paths return identical rankings.
pub fn evaluate_moves(
    grid: &Grid,
    tally: &OrbTally,
    player: Player,
    parallel: bool,
) -> Vec<ScoredMove> {
    let moves = legal_moves(grid, player);
    let score = |&mv: &Move| ScoredMove {
        mv,
        score: evaluate_move(grid, tally, player, mv),
    };
    let mut scored: Vec<ScoredMove> = if parallel {
        moves.par_iter().map(score).collect()
    } else {
        moves.iter().map(score).collect()
    };
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Picks a move for the hard tier.
///
/// Usually the best move; with `second_best_chance` the runner-up, and
/// otherwise with `near_best_chance` any move within `near_best_margin` of
/// the best.
pub fn select(
    grid: &Grid,
    tally: &OrbTally,
    player: Player,
    params: &LookaheadParams,
    rng: &mut impl Rng,
) -> Option<Move> {
    let ranked = evaluate_moves(grid, tally, player, params.parallel);
    let best = *ranked.first()?;
    debug!(
        candidates = ranked.len(),
        best_score = best.score,
        "lookahead ranking complete"
    );

    if ranked.len() > 1 && rng.gen::<f64>() < params.second_best_chance {
        return Some(ranked[1].mv);
    }

    let near: Vec<Move> = ranked
        .iter()
        .take_while(|m| m.score >= best.score - params.near_best_margin)
        .map(|m| m.mv)
        .collect();
    if near.len() > 1 && rng.gen::<f64>() < params.near_best_chance {
        return near.choose(rng).copied();
    }

    Some(best.mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Coord};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn deterministic() -> LookaheadParams {
        LookaheadParams {
            second_best_chance: 0.0,
            near_best_chance: 0.0,
            ..LookaheadParams::default()
        }
    }

    fn grid_with(rows: usize, cols: usize, cells: &[(usize, usize, Player, u32)]) -> Grid {
        let mut grid = Grid::new(rows, cols).unwrap();
        for &(r, c, p, n) in cells {
            grid.set(Coord::new(r, c), Cell::owned(p, n));
        }
        grid
    }

    #[test]
    fn finds_eliminating_chain() {
        // Detonating the loaded corner converts the lone opponent orb.
        let grid = grid_with(
            4,
            4,
            &[(0, 0, Player::Two, 1), (0, 1, Player::One, 1)],
        );
        let tally = OrbTally::from_grid(&grid);
        let mut rng = SmallRng::seed_from_u64(1);
        let mv = select(&grid, &tally, Player::Two, &deterministic(), &mut rng);
        assert_eq!(mv, Some(Coord::new(0, 0)));

        let ranked = evaluate_moves(&grid, &tally, Player::Two, false);
        assert!(ranked[0].score > 1000);
    }

    #[test]
    fn search_leaves_live_grid_untouched() {
        let grid = grid_with(
            4,
            4,
            &[(0, 0, Player::Two, 1), (1, 1, Player::One, 3)],
        );
        let tally = OrbTally::from_grid(&grid);
        let before = grid.clone();
        evaluate_moves(&grid, &tally, Player::Two, true);
        assert_eq!(grid, before);
        assert_eq!(tally, OrbTally::from_grid(&grid));
    }

    #[test]
    fn parallel_matches_sequential() {
        let grid = grid_with(
            6,
            7,
            &[
                (0, 0, Player::One, 1),
                (1, 1, Player::Two, 2),
                (2, 3, Player::One, 3),
                (3, 3, Player::Two, 2),
                (5, 6, Player::One, 1),
                (4, 2, Player::Two, 1),
            ],
        );
        let tally = OrbTally::from_grid(&grid);
        for player in [Player::One, Player::Two] {
            let par = evaluate_moves(&grid, &tally, player, true);
            let seq = evaluate_moves(&grid, &tally, player, false);
            assert_eq!(par, seq);
        }
    }

    #[test]
    fn ranking_sorted_and_complete() {
        let grid = grid_with(4, 5, &[(1, 1, Player::One, 2), (2, 3, Player::Two, 1)]);
        let tally = OrbTally::from_grid(&grid);
        let ranked = evaluate_moves(&grid, &tally, Player::Two, true);
        assert_eq!(ranked.len(), 19);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn second_best_chance_takes_runner_up() {
        let grid = grid_with(4, 4, &[(0, 0, Player::Two, 1), (0, 1, Player::One, 1)]);
        let tally = OrbTally::from_grid(&grid);
        let params = LookaheadParams {
            second_best_chance: 1.0,
            near_best_chance: 0.0,
            ..LookaheadParams::default()
        };
        let ranked = evaluate_moves(&grid, &tally, Player::Two, false);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(
                select(&grid, &tally, Player::Two, &params, &mut rng),
                Some(ranked[1].mv)
            );
        }
    }

    #[test]
    fn near_best_choice_stays_within_margin() {
        let grid = grid_with(5, 5, &[(2, 2, Player::One, 1), (0, 4, Player::Two, 1)]);
        let tally = OrbTally::from_grid(&grid);
        let params = LookaheadParams {
            second_best_chance: 0.0,
            near_best_chance: 1.0,
            ..LookaheadParams::default()
        };
        let ranked = evaluate_moves(&grid, &tally, Player::Two, false);
        let floor = ranked[0].score - params.near_best_margin;
        let mut rng = SmallRng::seed_from_u64(8);
        for _ in 0..20 {
            let mv = select(&grid, &tally, Player::Two, &params, &mut rng).unwrap();
            let score = ranked.iter().find(|m| m.mv == mv).unwrap().score;
            assert!(score >= floor);
        }
    }

    #[test]
    fn none_without_legal_moves() {
        let grid = grid_with(
            2,
            2,
            &[
                (0, 0, Player::One, 1),
                (0, 1, Player::One, 1),
                (1, 0, Player::One, 1),
                (1, 1, Player::One, 1),
            ],
        );
        let tally = OrbTally::from_grid(&grid);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            select(&grid, &tally, Player::Two, &LookaheadParams::default(), &mut rng),
            None
        );
    }
}
