//! AI-versus-AI match arena.
//!
//! Plays full matches between two difficulty tiers through the turn
//! controller, with one tier moving for each player and no pacing delays.
//! Games can run concurrently on a rayon pool; each game is seeded from the
//! arena seed plus its index, so results do not depend on the thread count.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error};

use crate::board::{Grid, GridError, OrbTally, Player, DEFAULT_COLS, DEFAULT_ROWS};
use crate::game::{MatchConfig, Mode, TurnController};
use crate::search::{select_move, Difficulty, StrategyParams};

/// Configuration for an arena run.
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Tier playing Player One, who always opens.
    pub first: Difficulty,
    /// Tier playing Player Two.
    pub second: Difficulty,
    pub rows: usize,
    pub cols: usize,
    /// Placements after which an unfinished game is scored as a draw.
    pub max_turns: u32,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    pub strategy: StrategyParams,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            num_games: 10,
            first: Difficulty::Hard,
            second: Difficulty::Medium,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            max_turns: 1000,
            threads: 4,
            seed: 0,
            strategy: StrategyParams::default(),
            quiet: false,
        }
    }
}

/// Errors that stop an arena run before any game is played.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One placement in a recorded game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub player: Player,
    pub row: usize,
    pub col: usize,
}

/// A complete arena game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub first: Difficulty,
    pub second: Difficulty,
    /// `None` when the turn limit was reached.
    pub winner: Option<Player>,
    pub turns: u32,
    pub final_tally: OrbTally,
    pub moves: Vec<MoveRecord>,
}

fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn tier_for(config: &ArenaConfig, player: Player) -> Difficulty {
    match player {
        Player::One => config.first,
        Player::Two => config.second,
    }
}

/// Plays a single game to completion or to the turn limit.
pub fn play_game(
    config: &ArenaConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, GridError> {
    let match_config = MatchConfig {
        rows: config.rows,
        cols: config.cols,
        mode: Mode::Pvp,
        difficulty: config.first,
        strategy: config.strategy,
        seed: config.seed,
        ..MatchConfig::default()
    }
    .instant();
    let mut game = TurnController::silent(match_config)?;
    let mut moves = Vec::new();

    while !game.state().game_over && game.state().turn_count < config.max_turns {
        let state = game.state();
        let player = state.current_player;
        let choice = select_move(
            &state.grid,
            &state.tally,
            player,
            tier_for(config, player),
            &config.strategy,
            rng,
        );
        let Some(mv) = choice else {
            debug!(game_id, player = player.number(), "no legal move");
            break;
        };
        if let Err(reason) = game.submit_move(mv) {
            error!(game_id, %reason, "arena move rejected");
            break;
        }
        moves.push(MoveRecord {
            player,
            row: mv.row,
            col: mv.col,
        });
    }

    let state = game.state();
    Ok(GameRecord {
        game_id,
        first: config.first,
        second: config.second,
        winner: state.winner,
        turns: state.turn_count,
        final_tally: state.tally,
        moves,
    })
}

fn describe(config: &ArenaConfig, game: &GameRecord) -> String {
    match game.winner {
        Some(w) => format!("{} ({}) wins", w.label(), tier_for(config, w)),
        None => "draw".to_string(),
    }
}

/// Runs the arena, returning records ordered by game id.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_arena(config: &ArenaConfig) -> Result<Vec<GameRecord>, ArenaError> {
    Grid::new(config.rows, config.cols)?;
    let completed = AtomicUsize::new(0);

    let play_one = |i: usize| -> Result<GameRecord, GridError> {
        let mut rng = game_rng(config.seed, i);
        let game_start = Instant::now();
        let game = play_game(config, i, &mut rng)?;
        if !config.quiet {
            let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
            eprintln!(
                "Game {}/{}: {} after {} turns ({:.2}s)",
                n,
                config.num_games,
                describe(config, &game),
                game.turns,
                game_start.elapsed().as_secs_f64(),
            );
        }
        Ok(game)
    };

    let games = if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| {
            (0..config.num_games)
                .into_par_iter()
                .map(play_one)
                .collect::<Result<Vec<_>, _>>()
        })?
    } else {
        (0..config.num_games)
            .map(play_one)
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(games)
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate results of an arena run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArenaSummary {
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    pub avg_turns: f64,
}

/// Tallies wins per side.
pub fn summarize(games: &[GameRecord]) -> ArenaSummary {
    let mut summary = ArenaSummary {
        games: games.len(),
        ..ArenaSummary::default()
    };
    let mut total_turns = 0u64;
    for game in games {
        total_turns += u64::from(game.turns);
        match game.winner {
            Some(Player::One) => summary.first_wins += 1,
            Some(Player::Two) => summary.second_wins += 1,
            None => summary.draws += 1,
        }
    }
    summary.avg_turns = total_turns as f64 / games.len().max(1) as f64;
    summary
}

/// Prints a summary of arena results to stderr.
pub fn print_summary(config: &ArenaConfig, games: &[GameRecord]) {
    let s = summarize(games);
    let pct = |n: usize| 100.0 * n as f64 / s.games.max(1) as f64;

    eprintln!("=== Arena Summary ===");
    eprintln!("Games: {}", s.games);
    eprintln!("Avg turns/game: {:.1}", s.avg_turns);
    eprintln!(
        "  P1 {:>6}: {} ({:.1}%)",
        config.first.name(),
        s.first_wins,
        pct(s.first_wins)
    );
    eprintln!(
        "  P2 {:>6}: {} ({:.1}%)",
        config.second.name(),
        s.second_wins,
        pct(s.second_wins)
    );
    eprintln!("  Draws    : {} ({:.1}%)", s.draws, pct(s.draws));
}
