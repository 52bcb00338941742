//! Live match management.

pub mod config;
pub mod controller;
pub mod observer;
pub mod state;

pub use config::{
    MatchConfig, Mode, UnknownMode, AI_PLAYER, DEFAULT_THINK_DELAY, DEFAULT_WAVE_DELAY,
};
pub use controller::{validate_ai_move, EngineError, MoveRejected, Ply, TurnController, TurnSummary};
pub use observer::{EventLog, MatchEvent, MatchObserver, NullObserver};
pub use state::MatchState;
