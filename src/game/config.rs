//! Match configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::{Player, DEFAULT_COLS, DEFAULT_ROWS};
use crate::search::{Difficulty, StrategyParams};

/// The player controlled by the AI in player-versus-engine matches.
pub const AI_PLAYER: Player = Player::Two;

/// Default pause between cascade waves while events are emitted.
pub const DEFAULT_WAVE_DELAY: Duration = Duration::from_millis(55);

/// Default pause before the AI picks its move.
pub const DEFAULT_THINK_DELAY: Duration = Duration::from_millis(400);

/// Who controls the second player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Two humans share the grid.
    Pvp,
    /// Player Two is the AI.
    Pve,
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode '{0}' (expected pvp or pve)")]
pub struct UnknownMode(pub String);

impl Mode {
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Pvp => "pvp",
            Mode::Pve => "pve",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pvp" => Ok(Mode::Pvp),
            "pve" => Ok(Mode::Pve),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Settings fixed at match start.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    pub rows: usize,
    pub cols: usize,
    pub mode: Mode,
    pub difficulty: Difficulty,
    /// Pause between cascade waves; presentation pacing only.
    pub wave_delay: Duration,
    /// Pause before the AI computes its move.
    pub think_delay: Duration,
    pub strategy: StrategyParams,
    /// Seed for the AI's random choices (0 = use entropy).
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            mode: Mode::Pve,
            difficulty: Difficulty::Hard,
            wave_delay: DEFAULT_WAVE_DELAY,
            think_delay: DEFAULT_THINK_DELAY,
            strategy: StrategyParams::default(),
            seed: 0,
        }
    }
}

impl MatchConfig {
    /// Returns the same configuration with all pacing delays removed.
    pub fn instant(self) -> Self {
        MatchConfig {
            wave_delay: Duration::ZERO,
            think_delay: Duration::ZERO,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_board() {
        let config = MatchConfig::default();
        assert_eq!((config.rows, config.cols), (8, 10));
        assert_eq!(config.mode, Mode::Pve);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.think_delay, Duration::from_millis(400));
    }

    #[test]
    fn instant_zeroes_delays() {
        let config = MatchConfig::default().instant();
        assert!(config.wave_delay.is_zero());
        assert!(config.think_delay.is_zero());
        assert_eq!(config.rows, 8);
    }

    #[test]
    fn mode_parses() {
        assert_eq!("pvp".parse::<Mode>(), Ok(Mode::Pvp));
        assert_eq!("PVE".parse::<Mode>(), Ok(Mode::Pve));
        assert!("coop".parse::<Mode>().is_err());
    }
}
