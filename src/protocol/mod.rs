//! Text protocol handling.
//!
//! Grid notation for positions and the command parser for the main loop.

pub mod notation;
pub mod parser;

pub use notation::{encode_grid, parse_grid, NotationError};
pub use parser::{parse_command, Command};
