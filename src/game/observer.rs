//! Match notifications for a presentation layer.
//!
//! Callbacks are advisory: the engine behaves identically whether or not
//! anything listens.

use std::fmt;

use serde::Serialize;

use crate::board::{Cell, Coord, OrbTally, Player};

/// Receives match notifications. All methods default to no-ops.
pub trait MatchObserver {
    /// A cell changed after a placement, burst or merge.
    fn on_cell_changed(&mut self, _coord: Coord, _cell: Cell) {}

    fn on_burst(&mut self, _coord: Coord) {}

    fn on_merge(&mut self, _coord: Coord) {}

    /// The active player or the AI thinking flag changed.
    fn on_status_changed(&mut self, _player: Player, _ai_thinking: bool) {}

    fn on_tally_changed(&mut self, _tally: &OrbTally) {}

    fn on_game_over(&mut self, _winner: Player, _message: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl MatchObserver for NullObserver {}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    CellChanged {
        row: usize,
        col: usize,
        owner: Option<Player>,
        orbs: u32,
    },
    Burst {
        row: usize,
        col: usize,
    },
    Merge {
        row: usize,
        col: usize,
    },
    Status {
        player: Player,
        ai_thinking: bool,
    },
    Tally {
        one: u32,
        two: u32,
    },
    GameOver {
        winner: Player,
        message: String,
    },
}

impl MatchEvent {
    /// Returns true for per-cell animation events.
    pub fn is_cell_event(&self) -> bool {
        matches!(
            self,
            MatchEvent::CellChanged { .. } | MatchEvent::Burst { .. } | MatchEvent::Merge { .. }
        )
    }
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchEvent::CellChanged {
                row,
                col,
                owner,
                orbs,
            } => match owner {
                Some(p) => write!(f, "cell {} {} {}{}", row, col, orbs, p.notation_char()),
                None => write!(f, "cell {} {} .", row, col),
            },
            MatchEvent::Burst { row, col } => write!(f, "burst {} {}", row, col),
            MatchEvent::Merge { row, col } => write!(f, "merge {} {}", row, col),
            MatchEvent::Status {
                player,
                ai_thinking,
            } => write!(
                f,
                "status {} {}",
                player.number(),
                if *ai_thinking { "thinking" } else { "idle" }
            ),
            MatchEvent::Tally { one, two } => write!(f, "tally {} {}", one, two),
            MatchEvent::GameOver { winner, message } => {
                write!(f, "gameover {} {}", winner.number(), message)
            }
        }
    }
}

/// Observer that records every notification in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<MatchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns all recorded events.
    pub fn drain(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }
}

impl MatchObserver for EventLog {
    fn on_cell_changed(&mut self, coord: Coord, cell: Cell) {
        self.events.push(MatchEvent::CellChanged {
            row: coord.row,
            col: coord.col,
            owner: cell.owner,
            orbs: cell.orbs,
        });
    }

    fn on_burst(&mut self, coord: Coord) {
        self.events.push(MatchEvent::Burst {
            row: coord.row,
            col: coord.col,
        });
    }

    fn on_merge(&mut self, coord: Coord) {
        self.events.push(MatchEvent::Merge {
            row: coord.row,
            col: coord.col,
        });
    }

    fn on_status_changed(&mut self, player: Player, ai_thinking: bool) {
        self.events.push(MatchEvent::Status {
            player,
            ai_thinking,
        });
    }

    fn on_tally_changed(&mut self, tally: &OrbTally) {
        self.events.push(MatchEvent::Tally {
            one: tally.get(Player::One),
            two: tally.get(Player::Two),
        });
    }

    fn on_game_over(&mut self, winner: Player, message: &str) {
        self.events.push(MatchEvent::GameOver {
            winner,
            message: message.to_string(),
        });
    }
}
