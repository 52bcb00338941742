//! Compact grid notation.
//!
//! Rows are separated by `/`, top row first. Each cell is either `.` for an
//! empty cell or an orb count followed by the owner (`a` for Player One,
//! `b` for Player Two). A 3x3 grid with two owned cells:
//!
//! ```text
//! 1a../.2b./...
//! ```
//!
//! The notation carries the grid only. Whose turn it is travels separately.

use crate::board::{Cell, Coord, Grid, GridError, Player};

/// Errors that can occur while parsing grid notation.
#[derive(Debug, thiserror::Error)]
pub enum NotationError {
    #[error("empty grid notation")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("invalid character '{ch}' in row {row}")]
    InvalidChar { row: usize, ch: char },

    #[error("orb count in row {row} is missing its owner")]
    MissingOwner { row: usize },

    #[error("invalid orb count '{0}'")]
    InvalidCount(String),

    #[error("owned cell ({row}, {col}) holds no orbs")]
    ZeroOrbs { row: usize, col: usize },

    #[error("cell ({row}, {col}) holds {orbs} orbs, above its capacity {capacity}")]
    OverCapacity {
        row: usize,
        col: usize,
        orbs: u32,
        capacity: u32,
    },

    #[error(transparent)]
    Dimensions(#[from] GridError),
}

/// Encodes a grid as notation.
pub fn encode_grid(grid: &Grid) -> String {
    let mut result = String::with_capacity(grid.cell_count() * 2 + grid.rows());
    for row in 0..grid.rows() {
        if row > 0 {
            result.push('/');
        }
        for col in 0..grid.cols() {
            let cell = grid.cell(Coord::new(row, col));
            match cell.owner {
                Some(p) if cell.orbs > 0 => {
                    result.push_str(&cell.orbs.to_string());
                    result.push(p.notation_char());
                }
                _ => result.push('.'),
            }
        }
    }
    result
}

/// Parses one row into cells.
fn parse_row(row: usize, s: &str) -> Result<Vec<Cell>, NotationError> {
    let mut cells = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '.' {
            cells.push(Cell::EMPTY);
            continue;
        }
        if !ch.is_ascii_digit() {
            return Err(NotationError::InvalidChar { row, ch });
        }

        let mut digits = String::from(ch);
        while let Some(&next) = chars.peek() {
            if !next.is_ascii_digit() {
                break;
            }
            digits.push(next);
            chars.next();
        }
        let orbs: u32 = digits
            .parse()
            .map_err(|_| NotationError::InvalidCount(digits.clone()))?;

        let owner_char = chars.next().ok_or(NotationError::MissingOwner { row })?;
        let owner = Player::from_notation_char(owner_char)
            .ok_or(NotationError::InvalidChar { row, ch: owner_char })?;
        if orbs == 0 {
            return Err(NotationError::ZeroOrbs {
                row,
                col: cells.len(),
            });
        }
        cells.push(Cell::owned(owner, orbs));
    }

    Ok(cells)
}

/// Parses notation into a grid.
///
/// Every row must have the same width, and no cell may hold more orbs than
/// its capacity.
pub fn parse_grid(s: &str) -> Result<Grid, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::Empty);
    }

    let rows: Vec<Vec<Cell>> = s
        .split('/')
        .enumerate()
        .map(|(i, row)| parse_row(i, row))
        .collect::<Result<_, _>>()?;

    let width = rows[0].len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(NotationError::RaggedRow {
                row: i,
                found: row.len(),
                expected: width,
            });
        }
    }

    let mut grid = Grid::new(rows.len(), width)?;
    for (r, row) in rows.into_iter().enumerate() {
        for (c, cell) in row.into_iter().enumerate() {
            let coord = Coord::new(r, c);
            let capacity = grid.capacity_at(coord);
            if cell.orbs > capacity {
                return Err(NotationError::OverCapacity {
                    row: r,
                    col: c,
                    orbs: cell.orbs,
                    capacity,
                });
            }
            grid.set(coord, cell);
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_empty_grid() {
        let grid = Grid::new(2, 3).unwrap();
        assert_eq!(encode_grid(&grid), ".../...");
    }

    #[test]
    fn encode_owned_cells() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(Coord::new(0, 0), Cell::owned(Player::One, 1));
        grid.set(Coord::new(1, 1), Cell::owned(Player::Two, 2));
        assert_eq!(encode_grid(&grid), "1a../.2b./...");
    }

    #[test]
    fn parse_owned_cells() {
        let grid = parse_grid("1a../.2b./...").unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.cell(Coord::new(0, 0)), Cell::owned(Player::One, 1));
        assert_eq!(grid.cell(Coord::new(1, 1)), Cell::owned(Player::Two, 2));
        assert_eq!(grid.total_orbs(), 3);
    }

    #[test]
    fn parse_ignores_surrounding_whitespace() {
        let grid = parse_grid("  ../..\n").unwrap();
        assert!(grid.is_clear());
    }

    #[test]
    fn encode_parse_preserves_played_grid() {
        let mut grid = Grid::new(4, 5).unwrap();
        grid.set(Coord::new(0, 4), Cell::owned(Player::Two, 1));
        grid.set(Coord::new(2, 2), Cell::owned(Player::One, 3));
        grid.set(Coord::new(3, 0), Cell::owned(Player::One, 1));
        let text = encode_grid(&grid);
        assert_eq!(text, "....1b/...../..3a../1a....");
        assert_eq!(parse_grid(&text).unwrap(), grid);
    }

    #[test]
    fn multi_digit_counts_parse() {
        // Digits are read as one count before the owner.
        let err = parse_grid("...../.12a.../.....").unwrap_err();
        assert!(matches!(err, NotationError::OverCapacity { orbs: 12, .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = parse_grid("../...").unwrap_err();
        assert!(matches!(
            err,
            NotationError::RaggedRow {
                row: 1,
                found: 3,
                expected: 2
            }
        ));
    }

    #[test]
    fn rejects_bad_owner() {
        assert!(matches!(
            parse_grid("1c./.."),
            Err(NotationError::InvalidChar { row: 0, ch: 'c' })
        ));
        assert!(matches!(
            parse_grid("../.1"),
            Err(NotationError::MissingOwner { row: 1 })
        ));
    }

    #[test]
    fn rejects_zero_orbs() {
        assert!(matches!(
            parse_grid("0a./.."),
            Err(NotationError::ZeroOrbs { row: 0, col: 0 })
        ));
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(parse_grid("..."), Err(NotationError::Dimensions(_))));
        assert!(matches!(parse_grid(""), Err(NotationError::Empty)));
    }

    #[test]
    fn rejects_over_capacity() {
        assert!(matches!(
            parse_grid("2a./.."),
            Err(NotationError::OverCapacity {
                row: 0,
                col: 0,
                orbs: 2,
                capacity: 1
            })
        ));
    }
}
