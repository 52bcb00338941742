//! Chain reaction engine library.
//!
//! Exposes the grid model, cascade resolution, win evaluation, AI tiers,
//! turn controller and protocol modules for use by integration tests and the
//! binary entry points.

pub mod board;
pub mod cascade;
pub mod engine;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod search;
pub mod selfplay;
