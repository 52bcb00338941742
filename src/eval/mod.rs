//! Position evaluation.
//!
//! Win detection for the turn controller, and the heuristics the AI tiers
//! use to rank candidate placements.

pub mod heuristic;
pub mod win;

pub use heuristic::{is_exposed, score_placement, score_position};
pub use win::{winner, Presence};
