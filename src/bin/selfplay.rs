//! AI-versus-AI arena CLI.
//!
//! Plays matches between two difficulty tiers and writes one JSON record per
//! game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --first TIER    Tier playing Player One (default: hard)
//!   --second TIER   Tier playing Player Two (default: medium)
//!   --rows N        Grid rows (default: 8)
//!   --cols N        Grid columns (default: 10)
//!   --max-turns N   Placements before a game is drawn (default: 1000)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress summary output

use std::env;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use chain_reaction::selfplay::{self, ArenaConfig};

/// Parses the value following `flag`, exiting with usage on failure.
fn parse_value<T>(args: &[String], i: usize, flag: &str) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = args.get(i) else {
        eprintln!("Missing value for {}", flag);
        print_usage();
        process::exit(1);
    };
    match raw.parse() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid {} value '{}': {}", flag, raw, e);
            process::exit(1);
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = ArenaConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--games" => {
                i += 1;
                config.num_games = parse_value(&args, i, flag);
            }
            "--first" => {
                i += 1;
                config.first = parse_value(&args, i, flag);
            }
            "--second" => {
                i += 1;
                config.second = parse_value(&args, i, flag);
            }
            "--rows" => {
                i += 1;
                config.rows = parse_value(&args, i, flag);
            }
            "--cols" => {
                i += 1;
                config.cols = parse_value(&args, i, flag);
            }
            "--max-turns" => {
                i += 1;
                config.max_turns = parse_value(&args, i, flag);
            }
            "--threads" => {
                i += 1;
                config.threads = parse_value(&args, i, flag);
            }
            "--seed" => {
                i += 1;
                config.seed = parse_value(&args, i, flag);
            }
            "--output" => {
                i += 1;
                output_path = Some(parse_value(&args, i, flag));
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if !config.quiet {
        eprintln!(
            "Arena: {} games, {} vs {}, {}x{} grid, max {} turns, {} threads",
            config.num_games,
            config.first,
            config.second,
            config.rows,
            config.cols,
            config.max_turns,
            config.threads
        );
    }

    let start = Instant::now();
    let games = match selfplay::run_arena(&config) {
        Ok(games) => games,
        Err(e) => {
            eprintln!("Arena failed: {}", e);
            process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::print_summary(&config, &games);
    }

    let written = match &output_path {
        Some(path) => File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            selfplay::write_jsonl(&games, &mut writer)
        }),
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer)
        }
    };
    if let Err(e) = written {
        eprintln!("Failed to write output: {}", e);
        process::exit(1);
    }
    if let (Some(path), false) = (&output_path, config.quiet) {
        eprintln!("Wrote {} games to {}", games.len(), path);
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --first TIER     Tier playing Player One (default: hard)");
    eprintln!("  --second TIER    Tier playing Player Two (default: medium)");
    eprintln!("  --rows N         Grid rows (default: 8)");
    eprintln!("  --cols N         Grid columns (default: 10)");
    eprintln!("  --max-turns N    Placements before a game is drawn (default: 1000)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress summary output");
    eprintln!("  --help           Show this help");
}
