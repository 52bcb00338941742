//! Board representation.
//!
//! Contains the core data structures for players, cells, the grid and its
//! capacity rules, and the per-player orb tally.

pub mod grid;
pub mod player;
pub mod tally;

pub use grid::{Grid, GridError, DEFAULT_COLS, DEFAULT_ROWS, MAX_DIMENSION, MIN_DIMENSION};
pub use player::{Cell, Coord, Player, ALL_PLAYERS, PLAYER_COUNT};
pub use tally::OrbTally;
