//! The playing grid.
//!
//! Cells are stored row-major in a single owned buffer, so cloning a grid
//! yields a fully independent copy. Capacity is derived from position:
//! corners hold 1 orb, edges 2, interior cells 3.

use super::player::{Cell, Coord, Player};

/// Default number of rows for a new match.
pub const DEFAULT_ROWS: usize = 8;

/// Default number of columns for a new match.
pub const DEFAULT_COLS: usize = 10;

/// Smallest supported side length.
pub const MIN_DIMENSION: usize = 2;

/// Largest supported side length.
pub const MAX_DIMENSION: usize = 64;

/// Errors that can occur when constructing a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid dimensions {rows}x{cols} must each be between 2 and 64")]
    BadDimensions { rows: usize, cols: usize },
}

/// A rows x cols matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&rows)
            || !(MIN_DIMENSION..=MAX_DIMENSION).contains(&cols)
        {
            return Err(GridError::BadDimensions { rows, cols });
        }
        Ok(Grid {
            rows,
            cols,
            cells: vec![Cell::EMPTY; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True when no cell holds an orb.
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Returns true if `coord` lies on the grid.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Flat buffer index of an in-bounds coordinate.
    pub fn index(&self, coord: Coord) -> usize {
        coord.row * self.cols + coord.col
    }

    /// Coordinate of a flat buffer index.
    pub fn coord_of(&self, index: usize) -> Coord {
        Coord::new(index / self.cols, index % self.cols)
    }

    /// Returns the cell at an in-bounds coordinate.
    pub fn cell(&self, coord: Coord) -> Cell {
        self.cells[self.index(coord)]
    }

    /// Returns the cell at `coord`, or `None` when out of bounds.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        if self.contains(coord) {
            Some(self.cell(coord))
        } else {
            None
        }
    }

    pub(crate) fn set(&mut self, coord: Coord, cell: Cell) {
        let idx = self.index(coord);
        self.cells[idx] = cell;
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        let idx = self.index(coord);
        &mut self.cells[idx]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let cols = self.cols;
        (0..self.cells.len()).map(move |i| Coord::new(i / cols, i % cols))
    }

    /// Maximum orbs a cell holds before detonating.
    pub fn capacity_at(&self, coord: Coord) -> u32 {
        let row_edge = coord.row == 0 || coord.row == self.rows - 1;
        let col_edge = coord.col == 0 || coord.col == self.cols - 1;
        match (row_edge, col_edge) {
            (true, true) => 1,
            (true, false) | (false, true) => 2,
            (false, false) => 3,
        }
    }

    /// Orthogonal neighbors in the fixed order up, down, left, right.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        let Coord { row, col } = coord;
        [
            (row > 0).then(|| Coord::new(row - 1, col)),
            (row + 1 < self.rows).then(|| Coord::new(row + 1, col)),
            (col > 0).then(|| Coord::new(row, col - 1)),
            (col + 1 < self.cols).then(|| Coord::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// Returns true if the cell holds more orbs than its capacity.
    pub fn is_over_capacity(&self, coord: Coord) -> bool {
        self.cell(coord).orbs > self.capacity_at(coord)
    }

    /// Returns true if one more orb would make the cell detonate.
    pub fn is_critical(&self, coord: Coord) -> bool {
        self.cell(coord).orbs + 1 > self.capacity_at(coord)
    }

    /// Adds one orb for `player` and returns the cell as it was before.
    ///
    /// Does not check legality; callers validate ownership first.
    pub fn place_orb(&mut self, coord: Coord, player: Player) -> Cell {
        let cell = self.cell_mut(coord);
        let prior = *cell;
        cell.owner = Some(player);
        cell.orbs += 1;
        prior
    }

    /// Total orbs owned by `player`.
    pub fn orbs_of(&self, player: Player) -> u32 {
        self.cells
            .iter()
            .filter(|c| c.is_owned_by(player))
            .map(|c| c.orbs)
            .sum()
    }

    /// Number of cells owned by `player`.
    pub fn cells_of(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| c.is_owned_by(player)).count()
    }

    /// Sum of all orbs on the grid.
    pub fn total_orbs(&self) -> u32 {
        self.cells.iter().map(|c| c.orbs).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_grid() -> Grid {
        Grid::new(DEFAULT_ROWS, DEFAULT_COLS).unwrap()
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert_eq!(
            Grid::new(1, 10),
            Err(GridError::BadDimensions { rows: 1, cols: 10 })
        );
        assert!(Grid::new(8, 0).is_err());
        assert!(Grid::new(2, 2).is_ok());
    }

    #[test]
    fn capacity_by_position_class() {
        let grid = default_grid();
        assert_eq!(grid.capacity_at(Coord::new(0, 0)), 1);
        assert_eq!(grid.capacity_at(Coord::new(7, 9)), 1);
        assert_eq!(grid.capacity_at(Coord::new(0, 9)), 1);
        assert_eq!(grid.capacity_at(Coord::new(0, 5)), 2);
        assert_eq!(grid.capacity_at(Coord::new(4, 0)), 2);
        assert_eq!(grid.capacity_at(Coord::new(7, 3)), 2);
        assert_eq!(grid.capacity_at(Coord::new(3, 3)), 3);
    }

    #[test]
    fn capacity_matches_neighbor_count_minus_one() {
        let grid = default_grid();
        for coord in grid.coords() {
            let n = grid.neighbors(coord).count() as u32;
            assert_eq!(grid.capacity_at(coord), n - 1, "at {:?}", coord);
        }
    }

    #[test]
    fn neighbors_in_fixed_order() {
        let grid = default_grid();
        let n: Vec<Coord> = grid.neighbors(Coord::new(3, 3)).collect();
        assert_eq!(
            n,
            vec![
                Coord::new(2, 3),
                Coord::new(4, 3),
                Coord::new(3, 2),
                Coord::new(3, 4)
            ]
        );
    }

    #[test]
    fn neighbors_clipped_at_corner() {
        let grid = default_grid();
        let n: Vec<Coord> = grid.neighbors(Coord::new(0, 0)).collect();
        assert_eq!(n, vec![Coord::new(1, 0), Coord::new(0, 1)]);
        let n: Vec<Coord> = grid.neighbors(Coord::new(7, 9)).collect();
        assert_eq!(n, vec![Coord::new(6, 9), Coord::new(7, 8)]);
    }

    #[test]
    fn place_orb_returns_prior_cell() {
        let mut grid = default_grid();
        let c = Coord::new(2, 2);
        assert_eq!(grid.place_orb(c, Player::One), Cell::EMPTY);
        assert_eq!(grid.place_orb(c, Player::One), Cell::owned(Player::One, 1));
        assert_eq!(grid.cell(c), Cell::owned(Player::One, 2));
    }

    #[test]
    fn clone_is_independent() {
        let mut grid = default_grid();
        let copy = grid.clone();
        grid.place_orb(Coord::new(1, 1), Player::Two);
        assert!(copy.is_clear());
        assert!(!grid.is_clear());
    }

    #[test]
    fn cell_count_ignores_orbs() {
        let mut grid = Grid::new(3, 4).unwrap();
        assert_eq!(grid.cell_count(), 12);
        assert!(grid.is_clear());

        grid.place_orb(Coord::new(2, 3), Player::One);
        assert_eq!(grid.cell_count(), 12);
        assert!(!grid.is_clear());
    }

    #[test]
    fn index_and_coord_agree() {
        let grid = default_grid();
        for (i, coord) in grid.coords().enumerate() {
            assert_eq!(grid.index(coord), i);
            assert_eq!(grid.coord_of(i), coord);
        }
    }

    #[test]
    fn counts_per_player() {
        let mut grid = default_grid();
        grid.place_orb(Coord::new(1, 1), Player::One);
        grid.place_orb(Coord::new(1, 1), Player::One);
        grid.place_orb(Coord::new(5, 5), Player::Two);
        assert_eq!(grid.orbs_of(Player::One), 2);
        assert_eq!(grid.cells_of(Player::One), 1);
        assert_eq!(grid.orbs_of(Player::Two), 1);
        assert_eq!(grid.total_orbs(), 3);
        assert!(grid.get(Coord::new(8, 0)).is_none());
    }
}
