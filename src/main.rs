//! Chain reaction engine speaking a line-oriented text protocol.
//!
//! Reads commands from stdin and writes responses to stdout. Diagnostics go
//! to stderr through `tracing`; set `RUST_LOG` to adjust verbosity.

use std::io::{self, BufRead};

use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use chain_reaction::engine::Engine;
use chain_reaction::protocol::parser::{parse_command, Command};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs the main protocol loop, reading commands from stdin and writing
/// responses to stdout.
fn main() {
    init_tracing();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let result = match cmd {
            Command::Cri => engine.handle_cri(&mut out),
            Command::IsReady => engine.handle_isready(&mut out),
            Command::SetOption { name, value } => {
                if let Err(e) = engine.set_option(&name, value.as_deref()) {
                    warn!(error = %e, "setoption failed");
                }
                Ok(())
            }
            Command::NewGame => engine.handle_newgame(&mut out),
            Command::Move { coord } => engine.handle_move(coord, &mut out),
            Command::Position { notation } => {
                if let Err(e) = engine.set_position(&notation) {
                    warn!(error = %e, "position rejected");
                }
                Ok(())
            }
            Command::SetPlayer { player } => {
                engine.set_player(player);
                Ok(())
            }
            Command::Go => engine.handle_go(&mut out),
            Command::Board => engine.handle_board(&mut out),
            Command::Quit => break,
        };

        if let Err(e) = result {
            error!(error = %e, "failed to write response");
            break;
        }
    }
}
