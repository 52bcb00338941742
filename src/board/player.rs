//! Players, cells, and grid coordinates.
//!
//! A match always has exactly two players. Cells store an owner and an orb
//! count; the owner is `None` exactly when the cell holds no orbs.

use serde::{Deserialize, Serialize};

/// The number of players in a match.
pub const PLAYER_COUNT: usize = 2;

/// One of the two players.
///
/// The `#[repr(u8)]` attribute enables use as an array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 0,
    Two = 1,
}

/// Both players in turn order.
pub const ALL_PLAYERS: [Player; PLAYER_COUNT] = [Player::One, Player::Two];

impl Player {
    /// Returns the array index for per-player tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the human-facing player number (1 or 2).
    pub const fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Parses a player from its number.
    pub fn from_number(n: u8) -> Option<Player> {
        match n {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Returns the other player.
    pub const fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Returns the owner character used in grid notation.
    pub const fn notation_char(self) -> char {
        match self {
            Player::One => 'a',
            Player::Two => 'b',
        }
    }

    /// Parses a player from its grid notation character.
    pub fn from_notation_char(c: char) -> Option<Player> {
        match c {
            'a' => Some(Player::One),
            'b' => Some(Player::Two),
            _ => None,
        }
    }

    /// Short label used in status lines ("P1", "P2").
    pub const fn label(self) -> &'static str {
        match self {
            Player::One => "P1",
            Player::Two => "P2",
        }
    }
}

/// A row/column position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }
}

/// Contents of a single grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub owner: Option<Player>,
    pub orbs: u32,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        owner: None,
        orbs: 0,
    };

    /// Creates a cell owned by `player` holding `orbs` orbs.
    pub const fn owned(player: Player, orbs: u32) -> Self {
        Cell {
            owner: Some(player),
            orbs,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns true if the cell belongs to `player`.
    pub fn is_owned_by(&self, player: Player) -> bool {
        self.owner == Some(player)
    }

    /// Returns true if `player` may place an orb here.
    pub fn accepts(&self, player: Player) -> bool {
        match self.owner {
            None => true,
            Some(p) => p == player,
        }
    }
}
