//! Heuristic scoring for move selection.
//!
//! Two scorers live here: a static one-move heuristic that looks only at the
//! target cell and its neighbors, and a position evaluation applied to the
//! grid after a placement has fully resolved.

use crate::board::{Coord, Grid, Player};

/// Bonus for a placement that detonates immediately.
const DETONATION_BONUS: f32 = 5.0;
/// Bonus per opponent orb adjacent to a detonating placement.
const CAPTURE_BONUS_PER_ORB: f32 = 2.0;
/// Penalty when an adjacent opponent cell is one orb from detonating.
const EXPOSED_PENALTY: f32 = 15.0;
/// Penalty per adjacent opponent cell within one orb of capacity.
const PRESSURE_PENALTY: f32 = 3.0;
const CORNER_BONUS: f32 = 1.0;
const EDGE_BONUS: f32 = 0.5;
/// Bonus for filling an own cell exactly to capacity.
const LOADED_BONUS: f32 = 3.0;

/// Bonus when the opponent has been wiped out.
pub const ELIMINATION_BONUS: i64 = 1000;
/// Penalty when the opponent holds a cell ready to detonate.
pub const THREAT_PENALTY: i64 = 500;
/// Bonus per own cell loaded exactly to capacity.
pub const LOADED_CELL_BONUS: i64 = 2;

/// Returns true if any neighbor owned by the opponent would detonate on its
/// next placement.
pub fn is_exposed(grid: &Grid, player: Player, coord: Coord) -> bool {
    let opponent = player.opponent();
    grid.neighbors(coord)
        .any(|n| grid.cell(n).is_owned_by(opponent) && grid.is_critical(n))
}

/// Scores placing an orb for `player` at `coord` without simulating it.
pub fn score_placement(grid: &Grid, player: Player, coord: Coord) -> f32 {
    let opponent = player.opponent();
    let cell = grid.cell(coord);
    let capacity = grid.capacity_at(coord);
    let detonates = grid.is_critical(coord);
    let mut score = 0.0f32;

    if detonates {
        score += DETONATION_BONUS;
        let adjacent_enemy_orbs: u32 = grid
            .neighbors(coord)
            .map(|n| grid.cell(n))
            .filter(|c| c.is_owned_by(opponent))
            .map(|c| c.orbs)
            .sum();
        score += adjacent_enemy_orbs as f32 * CAPTURE_BONUS_PER_ORB;
    }

    if is_exposed(grid, player, coord) {
        score -= EXPOSED_PENALTY;
    } else {
        let pressured = grid
            .neighbors(coord)
            .filter(|&n| {
                let c = grid.cell(n);
                c.is_owned_by(opponent) && c.orbs + 1 >= grid.capacity_at(n)
            })
            .count();
        score -= pressured as f32 * PRESSURE_PENALTY;
    }

    match capacity {
        1 => score += CORNER_BONUS,
        2 => score += EDGE_BONUS,
        _ => {}
    }

    if !detonates && cell.is_owned_by(player) && cell.orbs + 1 == capacity {
        score += LOADED_BONUS;
    }

    score
}

/// Evaluates a settled grid from `player`'s point of view.
pub fn score_position(grid: &Grid, player: Player) -> i64 {
    let opponent = player.opponent();
    let own_orbs = grid.orbs_of(player) as i64;
    let enemy_orbs = grid.orbs_of(opponent) as i64;
    let mut score = own_orbs - enemy_orbs;

    if enemy_orbs == 0 && own_orbs > 0 {
        score += ELIMINATION_BONUS;
    }

    let mut threatened = false;
    let mut loaded = 0i64;
    for (coord, cell) in grid.coords().zip(grid.cells()) {
        let capacity = grid.capacity_at(coord);
        match cell.owner {
            Some(p) if p == opponent && cell.orbs >= capacity => threatened = true,
            Some(p) if p == player && cell.orbs == capacity => loaded += 1,
            _ => {}
        }
    }
    if threatened {
        score -= THREAT_PENALTY;
    }
    score + loaded * LOADED_CELL_BONUS
}
