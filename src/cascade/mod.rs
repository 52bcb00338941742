//! Chain reaction resolution.
//!
//! Drains over-capacity cells in synchronous waves. Each detonation empties
//! the cell and pushes one orb into every neighbor, converting it to the
//! exploding player. Neighbors pushed over capacity detonate in the next
//! wave. The tally is kept in step with every transfer.
//!
//! Resolution is a pure function of the grid, tally, origin and player: the
//! optional observer only receives notifications and never feeds back.

mod pending;

use tracing::warn;

use crate::board::{Cell, Coord, Grid, OrbTally, Player};
use pending::{PendingQueue, WaveMarks};

/// Waves allowed per cell before a cascade is abandoned.
pub const STEP_CEILING_FACTOR: usize = 5;

/// Receives notifications while a cascade runs.
///
/// All methods default to no-ops. Passing no observer to [`run_cascade`]
/// suppresses every notification, including wave pacing.
pub trait CascadeObserver {
    /// A cell's contents changed.
    fn on_cell_changed(&mut self, _coord: Coord, _cell: Cell) {}

    /// A cell detonated and was emptied.
    fn on_burst(&mut self, _coord: Coord) {}

    /// An orb landed in a neighbor of a detonating cell.
    fn on_merge(&mut self, _coord: Coord) {}

    /// A wave with at least one detonation finished and another is pending.
    fn on_wave_settled(&mut self) {}
}

/// Outcome statistics of one cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeReport {
    /// Waves processed.
    pub waves: usize,
    /// Cells that detonated, counting repeats.
    pub detonations: usize,
    /// True if the step ceiling cut the chain short.
    pub overrun: bool,
}

/// Maximum number of waves for a grid.
pub fn step_ceiling(grid: &Grid) -> usize {
    grid.rows() * grid.cols() * STEP_CEILING_FACTOR
}

/// Resolves every detonation reachable from `origin`.
///
/// The origin is seeded as the first pending cell; if it is not over
/// capacity nothing happens. On overrun the grid is left as computed so far:
/// structurally valid, but possibly with cells above capacity.
pub fn run_cascade(
    grid: &mut Grid,
    tally: &mut OrbTally,
    origin: Coord,
    player: Player,
    mut observer: Option<&mut dyn CascadeObserver>,
) -> CascadeReport {
    let ceiling = step_ceiling(grid);
    let mut pending = PendingQueue::new(grid.cell_count());
    let mut processed = WaveMarks::new(grid.cell_count());
    let mut report = CascadeReport::default();

    pending.push(grid.index(origin), origin, player);

    while !pending.is_empty() {
        if report.waves >= ceiling {
            warn!(
                ceiling,
                detonations = report.detonations,
                remaining = pending.len(),
                "cascade step ceiling reached, aborting chain"
            );
            report.overrun = true;
            break;
        }
        report.waves += 1;
        processed.clear();

        let mut wave_detonated = false;
        for _ in 0..pending.len() {
            let Some((coord, index, exploding)) = pending.pop() else {
                break;
            };
            if processed.contains(index) || !grid.is_over_capacity(coord) {
                continue;
            }
            processed.insert(index);
            wave_detonated = true;
            report.detonations += 1;
            detonate(
                grid,
                tally,
                coord,
                exploding,
                &mut pending,
                &mut observer,
            );
        }

        if wave_detonated && !pending.is_empty() {
            if let Some(obs) = observer.as_mut() {
                obs.on_wave_settled();
            }
        }
    }

    report
}

/// Empties one cell and distributes an orb to each neighbor.
fn detonate(
    grid: &mut Grid,
    tally: &mut OrbTally,
    coord: Coord,
    exploding: Player,
    pending: &mut PendingQueue,
    observer: &mut Option<&mut dyn CascadeObserver>,
) {
    let source = grid.cell(coord);
    if let Some(owner) = source.owner {
        tally.debit(owner, source.orbs);
    }
    grid.set(coord, Cell::EMPTY);
    if let Some(obs) = observer.as_mut() {
        obs.on_burst(coord);
        obs.on_cell_changed(coord, Cell::EMPTY);
    }

    for neighbor in grid.neighbors(coord) {
        let prior = grid.cell(neighbor);
        if let Some(owner) = prior.owner {
            if owner != exploding {
                tally.debit(owner, prior.orbs);
                tally.credit(exploding, prior.orbs);
            }
        }
        tally.credit(exploding, 1);

        let updated = Cell::owned(exploding, prior.orbs + 1);
        grid.set(neighbor, updated);
        if let Some(obs) = observer.as_mut() {
            obs.on_merge(neighbor);
            obs.on_cell_changed(neighbor, updated);
        }

        if grid.is_over_capacity(neighbor) {
            pending.push(grid.index(neighbor), neighbor, exploding);
        }
    }
}
