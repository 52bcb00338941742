//! Turn controller: the single writer of a live match.
//!
//! A human submission is validated, placed, cascaded and checked for a
//! winner. In player-versus-engine matches the AI reply is played within
//! the same call, so a caller never observes the AI half-way through.

use std::thread;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, error, info};

use crate::board::{Cell, Coord, GridError, OrbTally, Player};
use crate::cascade::{run_cascade, CascadeObserver, CascadeReport};
use crate::eval::winner;
use crate::movegen::{has_legal_move, Move};
use crate::search::select_move;

use super::config::{MatchConfig, Mode, AI_PLAYER};
use super::observer::{MatchObserver, NullObserver};
use super::state::MatchState;

/// Reasons a submitted move is refused. Refusals never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejected {
    #[error("the match is over")]
    GameOver,
    #[error("a turn is still resolving")]
    TurnInProgress,
    #[error("the AI is thinking")]
    AiThinking,
    #[error("({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("({row}, {col}) is owned by the opponent")]
    OccupiedByOpponent { row: usize, col: usize },
    #[error("it is not the human player's turn")]
    NotYourTurn,
}

/// Internal consistency failures. The affected AI turn is forfeited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("AI for {player:?} returned no move while legal moves exist")]
    MissingMove { player: Player },
    #[error("AI for {player:?} chose ({row}, {col}) outside the grid")]
    MoveOutOfBounds { player: Player, row: usize, col: usize },
    #[error("AI for {player:?} chose opponent-owned cell ({row}, {col})")]
    OpponentCell { player: Player, row: usize, col: usize },
}

/// One placement and the cascade it triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ply {
    pub player: Player,
    pub coord: Coord,
    pub report: CascadeReport,
}

/// Everything that happened during one accepted submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnSummary {
    /// The human placement, followed by the AI reply if one was played.
    pub plies: Vec<Ply>,
    /// Set when the AI turn was forfeited.
    pub forfeit: Option<EngineError>,
    pub winner: Option<Player>,
}

/// Checks an AI choice against the live grid.
///
/// `Ok(None)` means the AI genuinely has no legal move.
pub fn validate_ai_move(
    state: &MatchState,
    player: Player,
    choice: Option<Move>,
) -> Result<Option<Move>, EngineError> {
    let grid = &state.grid;
    let Some(mv) = choice else {
        if has_legal_move(grid, player) {
            return Err(EngineError::MissingMove { player });
        }
        return Ok(None);
    };
    match grid.get(mv) {
        None => Err(EngineError::MoveOutOfBounds {
            player,
            row: mv.row,
            col: mv.col,
        }),
        Some(cell) if !cell.accepts(player) => Err(EngineError::OpponentCell {
            player,
            row: mv.row,
            col: mv.col,
        }),
        Some(_) => Ok(Some(mv)),
    }
}

/// Forwards cascade notifications and paces waves.
struct Pacer<'a, O> {
    observer: &'a mut O,
    wave_delay: Duration,
}

impl<O: MatchObserver> CascadeObserver for Pacer<'_, O> {
    fn on_cell_changed(&mut self, coord: Coord, cell: Cell) {
        self.observer.on_cell_changed(coord, cell);
    }

    fn on_burst(&mut self, coord: Coord) {
        self.observer.on_burst(coord);
    }

    fn on_merge(&mut self, coord: Coord) {
        self.observer.on_merge(coord);
    }

    fn on_wave_settled(&mut self) {
        pause(self.wave_delay);
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

/// Owns a match and applies submissions to it.
pub struct TurnController<O: MatchObserver = NullObserver> {
    config: MatchConfig,
    state: MatchState,
    observer: O,
    rng: SmallRng,
}

impl TurnController<NullObserver> {
    /// Creates a controller nobody listens to.
    pub fn silent(config: MatchConfig) -> Result<Self, GridError> {
        Self::new(config, NullObserver)
    }
}

impl<O: MatchObserver> TurnController<O> {
    pub fn new(config: MatchConfig, observer: O) -> Result<Self, GridError> {
        let state = MatchState::new(&config)?;
        let rng = if config.seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.seed)
        };
        info!(
            rows = config.rows,
            cols = config.cols,
            mode = %config.mode,
            difficulty = %config.difficulty,
            "match started"
        );
        Ok(TurnController {
            config,
            state,
            observer,
            rng,
        })
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Returns true if the side to move is the AI.
    pub fn is_ai_turn(&self) -> bool {
        self.state.mode == Mode::Pve && self.state.current_player == AI_PLAYER
    }

    /// Discards the current match and starts a fresh one with the same
    /// configuration.
    pub fn rematch(&mut self) -> Result<(), GridError> {
        self.state = MatchState::new(&self.config)?;
        info!("rematch started");
        self.observer
            .on_status_changed(self.state.current_player, false);
        self.observer.on_tally_changed(&self.state.tally);
        Ok(())
    }

    /// Short display name of a player in this match.
    pub fn player_label(&self, player: Player) -> String {
        if self.state.mode == Mode::Pve && player == AI_PLAYER {
            format!("AI ({})", self.state.difficulty.initial())
        } else {
            player.label().to_string()
        }
    }

    /// Announcement for a finished match.
    pub fn winner_message(&self, winner: Player) -> String {
        if self.state.mode == Mode::Pve && winner == AI_PLAYER {
            format!("AI ({}) Wins!", self.state.difficulty)
        } else {
            format!("Player {} Wins!", winner.number())
        }
    }

    /// Current status text for a presentation layer.
    pub fn status_line(&self) -> String {
        if let Some(w) = self.state.winner {
            return self.winner_message(w);
        }
        let label = self.player_label(self.state.current_player);
        if self.state.ai_thinking {
            format!("{} is thinking...", label)
        } else {
            format!("{}'s Turn", label)
        }
    }

    /// Submits a placement for the side to move.
    ///
    /// In player-versus-engine matches the AI reply is played before this
    /// returns.
    pub fn submit_move(&mut self, coord: Coord) -> Result<TurnSummary, MoveRejected> {
        if let Err(reason) = self.check_submission(coord) {
            debug!(row = coord.row, col = coord.col, %reason, "move rejected");
            return Err(reason);
        }

        let player = self.state.current_player;
        let mut summary = TurnSummary::default();
        self.state.turn_in_progress = true;
        summary.plies.push(self.play_ply(coord, player));

        if !self.finish_if_won() {
            self.switch_player();
            if self.is_ai_turn() {
                self.run_ai_turn(&mut summary);
            }
        }

        self.state.turn_in_progress = false;
        self.state.ai_thinking = false;
        if !self.state.game_over {
            self.observer
                .on_status_changed(self.state.current_player, false);
        }
        summary.winner = self.state.winner;
        Ok(summary)
    }

    fn check_submission(&self, coord: Coord) -> Result<(), MoveRejected> {
        let state = &self.state;
        if state.game_over {
            return Err(MoveRejected::GameOver);
        }
        if state.turn_in_progress {
            return Err(MoveRejected::TurnInProgress);
        }
        if state.ai_thinking {
            return Err(MoveRejected::AiThinking);
        }
        let Some(cell) = state.grid.get(coord) else {
            return Err(MoveRejected::OutOfBounds {
                row: coord.row,
                col: coord.col,
            });
        };
        if self.is_ai_turn() {
            return Err(MoveRejected::NotYourTurn);
        }
        if !cell.accepts(state.current_player) {
            return Err(MoveRejected::OccupiedByOpponent {
                row: coord.row,
                col: coord.col,
            });
        }
        Ok(())
    }

    /// Places one orb, resolves the cascade and refreshes the tally.
    fn play_ply(&mut self, coord: Coord, player: Player) -> Ply {
        self.state.turn_count += 1;
        debug!(
            turn = self.state.turn_count,
            player = player.number(),
            row = coord.row,
            col = coord.col,
            "placing orb"
        );

        let prior = self.state.grid.place_orb(coord, player);
        self.state.tally.record_placement(prior, player);
        self.observer
            .on_cell_changed(coord, self.state.grid.cell(coord));

        let mut pacer = Pacer {
            observer: &mut self.observer,
            wave_delay: self.config.wave_delay,
        };
        let report = run_cascade(
            &mut self.state.grid,
            &mut self.state.tally,
            coord,
            player,
            Some(&mut pacer),
        );

        let recount = OrbTally::from_grid(&self.state.grid);
        if recount != self.state.tally {
            debug!(
                running = ?self.state.tally,
                recount = ?recount,
                "tally drifted, using recount"
            );
        }
        self.state.tally = recount;
        self.observer.on_tally_changed(&self.state.tally);

        Ply {
            player,
            coord,
            report,
        }
    }

    fn switch_player(&mut self) {
        self.state.current_player = self.state.current_player.opponent();
        self.observer
            .on_status_changed(self.state.current_player, self.state.ai_thinking);
    }

    fn finish_if_won(&mut self) -> bool {
        match winner(&self.state.grid, self.state.turn_count) {
            Some(p) => {
                self.end_match(p);
                true
            }
            None => false,
        }
    }

    fn end_match(&mut self, winner: Player) {
        self.state.game_over = true;
        self.state.winner = Some(winner);
        let message = self.winner_message(winner);
        info!(
            winner = winner.number(),
            turns = self.state.turn_count,
            %message,
            "match over"
        );
        self.observer.on_game_over(winner, &message);
    }

    fn run_ai_turn(&mut self, summary: &mut TurnSummary) {
        let ai = self.state.current_player;
        self.state.ai_thinking = true;
        self.observer.on_status_changed(ai, true);
        pause(self.config.think_delay);

        let choice = select_move(
            &self.state.grid,
            &self.state.tally,
            ai,
            self.state.difficulty,
            &self.config.strategy,
            &mut self.rng,
        );
        self.apply_ai_choice(choice, summary);
    }

    fn apply_ai_choice(&mut self, choice: Option<Move>, summary: &mut TurnSummary) {
        let ai = self.state.current_player;
        match validate_ai_move(&self.state, ai, choice) {
            Ok(Some(mv)) => {
                self.state.ai_thinking = false;
                summary.plies.push(self.play_ply(mv, ai));
                if !self.finish_if_won() {
                    self.switch_player();
                }
            }
            Ok(None) => {
                self.state.ai_thinking = false;
                self.end_match(ai.opponent());
            }
            Err(err) => {
                error!(%err, "AI turn forfeited");
                summary.forfeit = Some(err);
                self.state.ai_thinking = false;
                self.switch_player();
            }
        }
    }
}
