//! Work queues for cascade resolution.
//!
//! Membership is tracked with grid-sized flag vectors, so checking whether a
//! cell is already queued or already detonated this wave is O(1).

use std::collections::VecDeque;

use crate::board::{Coord, Player};

#[derive(Debug, Clone, Copy)]
struct Entry {
    index: usize,
    coord: Coord,
    player: Player,
}

/// FIFO of cells waiting to detonate, with at most one entry per cell.
pub(crate) struct PendingQueue {
    entries: VecDeque<Entry>,
    queued: Vec<bool>,
}

impl PendingQueue {
    pub(crate) fn new(cell_count: usize) -> Self {
        PendingQueue {
            entries: VecDeque::with_capacity(16),
            queued: vec![false; cell_count],
        }
    }

    /// Enqueues a cell unless it is already waiting. Returns true if added.
    pub(crate) fn push(&mut self, index: usize, coord: Coord, player: Player) -> bool {
        if self.queued[index] {
            return false;
        }
        self.queued[index] = true;
        self.entries.push_back(Entry {
            index,
            coord,
            player,
        });
        true
    }

    /// Removes the oldest entry, returning its coordinate, flat index and
    /// exploding player.
    pub(crate) fn pop(&mut self) -> Option<(Coord, usize, Player)> {
        let entry = self.entries.pop_front()?;
        self.queued[entry.index] = false;
        Some((entry.coord, entry.index, entry.player))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cells already detonated during the current wave.
pub(crate) struct WaveMarks {
    marked: Vec<bool>,
    touched: Vec<usize>,
}

impl WaveMarks {
    pub(crate) fn new(cell_count: usize) -> Self {
        WaveMarks {
            marked: vec![false; cell_count],
            touched: Vec::with_capacity(16),
        }
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.marked[index]
    }

    pub(crate) fn insert(&mut self, index: usize) {
        if !self.marked[index] {
            self.marked[index] = true;
            self.touched.push(index);
        }
    }

    /// Resets only the flags set since the last clear.
    pub(crate) fn clear(&mut self) {
        for idx in self.touched.drain(..) {
            self.marked[idx] = false;
        }
    }
}
