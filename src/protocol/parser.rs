//! Command parser for the text protocol.
//!
//! Turns raw input lines into structured `Command` variants that the
//! engine main loop dispatches on.

use tracing::warn;

use crate::board::{Coord, Player};

/// A parsed front-end-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake.
    Cri,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Start a match from the current options.
    NewGame,

    /// Submit a placement to the live match.
    Move { coord: Coord },

    /// Set the analysis position from grid notation.
    Position { notation: String },

    /// Set the side to move in the analysis position.
    SetPlayer { player: Player },

    /// Ask for the AI's choice.
    Go,

    /// Print the current grid.
    Board,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, args) = tokens.split_first()?;

    match head {
        "cri" => Some(Command::Cri),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "go" => Some(Command::Go),
        "board" => Some(Command::Board),

        "setoption" => parse_setoption(args),
        "move" => parse_move(args),
        "position" => parse_position(args),
        "setplayer" => parse_setplayer(args),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(args: &[&str]) -> Option<Command> {
    if args.len() < 2 || args[0] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let (name_parts, value_parts) = match args.iter().position(|&t| t == "value") {
        Some(vi) => (&args[1..vi], &args[vi + 1..]),
        None => (&args[1..], &args[args.len()..]),
    };
    if name_parts.is_empty() {
        warn!("malformed setoption: empty name");
        return None;
    }

    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };
    Some(Command::SetOption {
        name: name_parts.join(" "),
        value,
    })
}

/// Parses `move <row> <col>`.
fn parse_move(args: &[&str]) -> Option<Command> {
    let [row, col] = args else {
        warn!("malformed move: expected 'move <row> <col>'");
        return None;
    };
    match (row.parse::<usize>(), col.parse::<usize>()) {
        (Ok(row), Ok(col)) => Some(Command::Move {
            coord: Coord::new(row, col),
        }),
        _ => {
            warn!(row = *row, col = *col, "malformed move coordinates");
            None
        }
    }
}

/// Parses `position <notation>`.
fn parse_position(args: &[&str]) -> Option<Command> {
    let Some(notation) = args.first() else {
        warn!("malformed position: expected 'position <notation>'");
        return None;
    };
    Some(Command::Position {
        notation: notation.to_string(),
    })
}

/// Parses `setplayer <1|2>`.
fn parse_setplayer(args: &[&str]) -> Option<Command> {
    let Some(arg) = args.first() else {
        warn!("malformed setplayer: expected 'setplayer <1|2>'");
        return None;
    };
    match arg.parse::<u8>().ok().and_then(Player::from_number) {
        Some(player) => Some(Command::SetPlayer { player }),
        None => {
            warn!(player = *arg, "unknown player");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_commands() {
        assert_eq!(parse_command("cri"), Some(Command::Cri));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("go"), Some(Command::Go));
        assert_eq!(parse_command("board"), Some(Command::Board));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar"), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        let cmd = parse_command("setoption name Difficulty value medium").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "Difficulty".to_string(),
                value: Some("medium".to_string()),
            }
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        let cmd = parse_command("setoption name Events").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "Events".to_string(),
                value: None,
            }
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
        assert_eq!(parse_command("setoption name value 3"), None);
    }

    #[test]
    fn parse_move_coordinates() {
        assert_eq!(
            parse_command("move 3 7"),
            Some(Command::Move {
                coord: Coord::new(3, 7)
            })
        );
    }

    #[test]
    fn parse_move_malformed_returns_none() {
        assert_eq!(parse_command("move"), None);
        assert_eq!(parse_command("move 3"), None);
        assert_eq!(parse_command("move 3 x"), None);
        assert_eq!(parse_command("move -1 2"), None);
        assert_eq!(parse_command("move 1 2 3"), None);
    }

    #[test]
    fn parse_position_notation() {
        let notation = "1a../.2b./...";
        assert_eq!(
            parse_command(&format!("position {}", notation)),
            Some(Command::Position {
                notation: notation.to_string()
            })
        );
        assert_eq!(parse_command("position"), None);
    }

    #[test]
    fn parse_setplayer() {
        assert_eq!(
            parse_command("setplayer 2"),
            Some(Command::SetPlayer {
                player: Player::Two
            })
        );
        assert_eq!(parse_command("setplayer 3"), None);
        assert_eq!(parse_command("setplayer"), None);
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  cri  "), Some(Command::Cri));
        assert_eq!(
            parse_command("\tmove 0 0 \n"),
            Some(Command::Move {
                coord: Coord::new(0, 0)
            })
        );
    }
}
