//! Engine state management.
//!
//! Holds the engine options, the live match and an optional analysis
//! position, and answers protocol commands by writing to any `Write` sink.

use std::io::{self, Write};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::board::{Coord, Grid, OrbTally, Player, MAX_DIMENSION, MIN_DIMENSION};
use crate::game::{EventLog, MatchConfig, MatchEvent, MatchState, Mode, TurnController};
use crate::protocol::notation::{encode_grid, parse_grid, NotationError};
use crate::search::{select_move, Difficulty};

/// Largest accepted pacing delay, in milliseconds.
const MAX_DELAY_MS: u64 = 10_000;

/// Errors from `setoption`.
#[derive(Debug, thiserror::Error)]
pub enum OptionError {
    #[error("unknown option '{0}'")]
    Unknown(String),

    #[error("option '{0}' needs a value")]
    MissingValue(String),

    #[error("invalid value '{value}' for option '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

fn invalid(name: &str, value: &str, reason: impl ToString) -> OptionError {
    OptionError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_dimension(name: &str, value: &str) -> Result<usize, OptionError> {
    let n: usize = value.parse().map_err(|e| invalid(name, value, e))?;
    if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&n) {
        return Err(invalid(
            name,
            value,
            format!("must be between {} and {}", MIN_DIMENSION, MAX_DIMENSION),
        ));
    }
    Ok(n)
}

fn parse_delay(name: &str, value: &str) -> Result<Duration, OptionError> {
    let ms: u64 = value.parse().map_err(|e| invalid(name, value, e))?;
    if ms > MAX_DELAY_MS {
        return Err(invalid(
            name,
            value,
            format!("must be at most {}", MAX_DELAY_MS),
        ));
    }
    Ok(Duration::from_millis(ms))
}

fn parse_check(name: &str, value: &str) -> Result<bool, OptionError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(invalid(name, value, "expected true or false")),
    }
}

fn seeded_rng(seed: u64) -> SmallRng {
    if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    }
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    /// Configuration applied at the next `newgame`.
    pub config: MatchConfig,
    /// Print per-cell cascade events after each move.
    pub events: bool,
    game: Option<TurnController<EventLog>>,
    analysis: Option<Grid>,
    analysis_player: Player,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with default options and no match.
    pub fn new() -> Self {
        Engine {
            config: MatchConfig::default(),
            events: false,
            game: None,
            analysis: None,
            analysis_player: Player::One,
            rng: SmallRng::from_entropy(),
        }
    }

    /// State of the live match, if one is running.
    pub fn match_state(&self) -> Option<&MatchState> {
        self.game.as_ref().map(|g| g.state())
    }

    /// Sets an engine option. Takes effect at the next `newgame`.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), OptionError> {
        let key = name.to_ascii_lowercase();
        if key == "events" && value.is_none() {
            self.events = true;
            return Ok(());
        }
        let value = value.ok_or_else(|| OptionError::MissingValue(name.to_string()))?;

        match key.as_str() {
            "rows" => self.config.rows = parse_dimension(name, value)?,
            "cols" => self.config.cols = parse_dimension(name, value)?,
            "mode" => {
                self.config.mode = value
                    .parse::<Mode>()
                    .map_err(|e| invalid(name, value, e))?
            }
            "difficulty" => {
                self.config.difficulty = value
                    .parse::<Difficulty>()
                    .map_err(|e| invalid(name, value, e))?
            }
            "wavedelay" => self.config.wave_delay = parse_delay(name, value)?,
            "thinkdelay" => self.config.think_delay = parse_delay(name, value)?,
            "seed" => {
                self.config.seed = value
                    .parse::<u64>()
                    .map_err(|e| invalid(name, value, e))?;
                self.rng = seeded_rng(self.config.seed);
            }
            "events" => self.events = parse_check(name, value)?,
            _ => return Err(OptionError::Unknown(name.to_string())),
        }
        debug!(option = name, value, "option set");
        Ok(())
    }

    /// Handles the protocol handshake.
    pub fn handle_cri<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name chain-reaction")?;
        writeln!(out, "id author chain-reaction")?;
        writeln!(
            out,
            "option name Rows type spin default {} min {} max {}",
            self.config.rows, MIN_DIMENSION, MAX_DIMENSION
        )?;
        writeln!(
            out,
            "option name Cols type spin default {} min {} max {}",
            self.config.cols, MIN_DIMENSION, MAX_DIMENSION
        )?;
        writeln!(
            out,
            "option name Mode type combo default {} var pvp var pve",
            self.config.mode
        )?;
        writeln!(
            out,
            "option name Difficulty type combo default {} var easy var medium var hard",
            self.config.difficulty
        )?;
        writeln!(
            out,
            "option name WaveDelay type spin default {} min 0 max {}",
            self.config.wave_delay.as_millis(),
            MAX_DELAY_MS
        )?;
        writeln!(
            out,
            "option name ThinkDelay type spin default {} min 0 max {}",
            self.config.think_delay.as_millis(),
            MAX_DELAY_MS
        )?;
        writeln!(out, "option name Seed type string default {}", self.config.seed)?;
        writeln!(out, "option name Events type check default {}", self.events)?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "criok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Starts a match from the current options and clears any analysis
    /// position.
    pub fn handle_newgame<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.analysis = None;
        self.analysis_player = Player::One;
        match TurnController::new(self.config.clone(), EventLog::new()) {
            Ok(game) => {
                writeln!(out, "status {}", game.status_line())?;
                self.game = Some(game);
            }
            Err(e) => {
                warn!(error = %e, "newgame failed");
                self.game = None;
                writeln!(out, "error {}", e)?;
            }
        }
        out.flush()
    }

    /// Handles `move <row> <col>` against the live match, starting one if
    /// needed.
    pub fn handle_move<W: Write>(&mut self, coord: Coord, out: &mut W) -> io::Result<()> {
        if self.game.is_none() {
            debug!("move without a match, starting one");
            self.handle_newgame(&mut io::sink())?;
        }
        let show_events = self.events;
        let Some(game) = self.game.as_mut() else {
            writeln!(out, "error no match")?;
            return out.flush();
        };

        let result = game.submit_move(coord);
        let events = game.observer_mut().drain();
        match result {
            Ok(summary) => {
                if show_events {
                    for event in events.iter().filter(|e| e.is_cell_event()) {
                        writeln!(out, "info {}", event)?;
                    }
                }
                for ply in summary.plies.iter().skip(1) {
                    writeln!(out, "aimove {} {}", ply.coord.row, ply.coord.col)?;
                }
                if let Some(err) = summary.forfeit {
                    writeln!(out, "info forfeit {}", err)?;
                }
                write_match(game, &events, out)?;
            }
            Err(reason) => writeln!(out, "rejected {}", reason)?,
        }
        out.flush()
    }

    /// Sets the analysis position.
    pub fn set_position(&mut self, notation: &str) -> Result<(), NotationError> {
        self.analysis = Some(parse_grid(notation)?);
        Ok(())
    }

    /// Sets the side to move in the analysis position.
    pub fn set_player(&mut self, player: Player) {
        self.analysis_player = player;
    }

    /// The grid and side to move that `go` and `board` act on: the analysis
    /// position if one is set, otherwise the live match.
    fn target(&self) -> Option<(&Grid, Player)> {
        if let Some(grid) = &self.analysis {
            return Some((grid, self.analysis_player));
        }
        self.game
            .as_ref()
            .map(|g| (&g.state().grid, g.state().current_player))
    }

    /// Handles the `go` command at the configured difficulty.
    pub fn handle_go<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some((grid, player)) = self.target() else {
            warn!("go: no position set");
            return Ok(());
        };
        let grid = grid.clone();
        let tally = OrbTally::from_grid(&grid);
        let choice = select_move(
            &grid,
            &tally,
            player,
            self.config.difficulty,
            &self.config.strategy,
            &mut self.rng,
        );
        match choice {
            Some(mv) => writeln!(out, "bestmove {} {}", mv.row, mv.col)?,
            None => writeln!(out, "bestmove none")?,
        }
        out.flush()
    }

    /// Handles the `board` command.
    pub fn handle_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some((grid, _)) = self.target() else {
            warn!("board: no position set");
            return Ok(());
        };
        writeln!(out, "board {}", encode_grid(grid))?;
        out.flush()
    }
}

/// Writes the board, tally and status or result of a match.
fn write_match<W: Write>(
    game: &TurnController<EventLog>,
    events: &[MatchEvent],
    out: &mut W,
) -> io::Result<()> {
    let state = game.state();
    writeln!(out, "board {}", encode_grid(&state.grid))?;
    writeln!(
        out,
        "tally {} {}",
        state.tally.get(Player::One),
        state.tally.get(Player::Two)
    )?;
    let over = events
        .iter()
        .find(|e| matches!(e, MatchEvent::GameOver { .. }));
    match (state.winner, over) {
        (_, Some(event)) => writeln!(out, "{}", event),
        (Some(w), None) => writeln!(out, "gameover {} {}", w.number(), game.winner_message(w)),
        (None, None) => writeln!(out, "status {}", game.status_line()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_of(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn instant_engine() -> Engine {
        let mut engine = Engine::new();
        engine.set_option("WaveDelay", Some("0")).unwrap();
        engine.set_option("ThinkDelay", Some("0")).unwrap();
        engine.set_option("Seed", Some("17")).unwrap();
        engine
    }

    #[test]
    fn new_engine_has_defaults() {
        let engine = Engine::new();
        assert_eq!(engine.config, MatchConfig::default());
        assert!(!engine.events);
        assert!(engine.match_state().is_none());
    }

    #[test]
    fn handle_cri_outputs_handshake() {
        let engine = Engine::new();
        let text = output_of(|out| engine.handle_cri(out));
        assert!(text.starts_with("id name chain-reaction\n"));
        assert!(text.contains("option name Difficulty type combo default hard"));
        assert!(text.contains("option name Rows type spin default 8 min 2 max 64"));
        assert!(text.contains("protocol_version 1"));
        assert!(text.trim_end().ends_with("criok"));
    }

    #[test]
    fn handle_isready_outputs_readyok() {
        let engine = Engine::new();
        assert_eq!(output_of(|out| engine.handle_isready(out)).trim(), "readyok");
    }

    #[test]
    fn set_option_updates_config() {
        let mut engine = Engine::new();
        engine.set_option("Rows", Some("5")).unwrap();
        engine.set_option("cols", Some("6")).unwrap();
        engine.set_option("Mode", Some("pvp")).unwrap();
        engine.set_option("Difficulty", Some("easy")).unwrap();
        engine.set_option("ThinkDelay", Some("0")).unwrap();
        engine.set_option("Events", None).unwrap();
        assert_eq!((engine.config.rows, engine.config.cols), (5, 6));
        assert_eq!(engine.config.mode, Mode::Pvp);
        assert_eq!(engine.config.difficulty, Difficulty::Easy);
        assert!(engine.config.think_delay.is_zero());
        assert!(engine.events);
    }

    #[test]
    fn set_option_rejects_bad_input() {
        let mut engine = Engine::new();
        assert!(matches!(
            engine.set_option("Threads", Some("4")),
            Err(OptionError::Unknown(_))
        ));
        assert!(matches!(
            engine.set_option("Rows", None),
            Err(OptionError::MissingValue(_))
        ));
        assert!(matches!(
            engine.set_option("Rows", Some("1")),
            Err(OptionError::InvalidValue { .. })
        ));
        assert!(matches!(
            engine.set_option("Difficulty", Some("brutal")),
            Err(OptionError::InvalidValue { .. })
        ));
        assert!(matches!(
            engine.set_option("WaveDelay", Some("soon")),
            Err(OptionError::InvalidValue { .. })
        ));
        assert_eq!(engine.config, MatchConfig::default());
    }

    #[test]
    fn newgame_reports_status() {
        let mut engine = instant_engine();
        let text = output_of(|out| engine.handle_newgame(out));
        assert_eq!(text.trim(), "status P1's Turn");
        assert!(engine.match_state().is_some());
    }

    #[test]
    fn move_plays_human_and_ai() {
        let mut engine = instant_engine();
        engine.handle_newgame(&mut io::sink()).unwrap();
        let text = output_of(|out| engine.handle_move(Coord::new(3, 3), out));

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("aimove "), "{}", text);
        assert!(lines.iter().any(|l| l.starts_with("board ")));
        assert!(lines.contains(&"tally 1 1"));
        assert_eq!(lines.last(), Some(&"status P1's Turn"));

        let state = engine.match_state().unwrap();
        assert_eq!(state.turn_count, 2);
    }

    #[test]
    fn move_without_newgame_starts_match() {
        let mut engine = instant_engine();
        engine.set_option("Mode", Some("pvp")).unwrap();
        let text = output_of(|out| engine.handle_move(Coord::new(0, 0), out));
        assert!(text.contains("status P2's Turn"));
    }

    #[test]
    fn rejected_move_is_reported() {
        let mut engine = instant_engine();
        engine.set_option("Mode", Some("pvp")).unwrap();
        engine.handle_newgame(&mut io::sink()).unwrap();
        engine.handle_move(Coord::new(1, 1), &mut io::sink()).unwrap();
        let text = output_of(|out| engine.handle_move(Coord::new(1, 1), out));
        assert_eq!(text.trim(), "rejected (1, 1) is owned by the opponent");
        let text = output_of(|out| engine.handle_move(Coord::new(8, 0), out));
        assert_eq!(text.trim(), "rejected (8, 0) is outside the grid");
    }

    #[test]
    fn events_and_gameover_are_printed() {
        let mut engine = instant_engine();
        engine.set_option("Mode", Some("pvp")).unwrap();
        engine.set_option("Events", Some("on")).unwrap();
        engine.handle_newgame(&mut io::sink()).unwrap();
        engine.handle_move(Coord::new(0, 0), &mut io::sink()).unwrap();
        engine.handle_move(Coord::new(0, 1), &mut io::sink()).unwrap();
        let text = output_of(|out| engine.handle_move(Coord::new(0, 0), out));

        assert!(text.contains("info burst 0 0"));
        assert!(text.contains("info merge 0 1"));
        assert!(text.contains("info cell 0 1 2a"));
        assert!(text.contains("tally 3 0"));
        assert_eq!(text.lines().last(), Some("gameover 1 Player 1 Wins!"));

        let text = output_of(|out| engine.handle_move(Coord::new(5, 5), out));
        assert_eq!(text.trim(), "rejected the match is over");
    }

    #[test]
    fn go_on_analysis_position() {
        let mut engine = instant_engine();
        engine.set_option("Difficulty", Some("hard")).unwrap();
        engine.config.strategy.hard.second_best_chance = 0.0;
        engine.config.strategy.hard.near_best_chance = 0.0;
        engine.set_position("1b1a../..../..../....").unwrap();
        engine.set_player(Player::Two);
        let text = output_of(|out| engine.handle_go(out));
        assert_eq!(text.trim(), "bestmove 0 0");
    }

    #[test]
    fn go_reports_none_when_shut_out() {
        let mut engine = instant_engine();
        engine.set_position("1a1a/1a1a").unwrap();
        engine.set_player(Player::Two);
        assert_eq!(output_of(|out| engine.handle_go(out)).trim(), "bestmove none");
    }

    #[test]
    fn go_without_position_prints_nothing() {
        let mut engine = instant_engine();
        assert_eq!(output_of(|out| engine.handle_go(out)), "");
    }

    #[test]
    fn board_prefers_analysis_position() {
        let mut engine = instant_engine();
        engine.set_option("Mode", Some("pvp")).unwrap();
        engine.handle_newgame(&mut io::sink()).unwrap();
        engine.handle_move(Coord::new(0, 0), &mut io::sink()).unwrap();
        let text = output_of(|out| engine.handle_board(out));
        assert!(text.starts_with("board 1a........./"));

        engine.set_position("../.1b").unwrap();
        let text = output_of(|out| engine.handle_board(out));
        assert_eq!(text.trim(), "board ../.1b");

        engine.handle_newgame(&mut io::sink()).unwrap();
        let text = output_of(|out| engine.handle_board(out));
        assert!(text.starts_with("board ........../"));
    }

    #[test]
    fn invalid_position_keeps_previous() {
        let mut engine = instant_engine();
        engine.set_position("../..").unwrap();
        assert!(engine.set_position("../...").is_err());
        let text = output_of(|out| engine.handle_board(out));
        assert_eq!(text.trim(), "board ../..");
    }
}
