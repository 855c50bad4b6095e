//! Fixed 10x20 playfield. Row 0 is the top, storage is row-major.

use crate::error::GridError;

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled,
}

impl Cell {
    pub fn is_filled(self) -> bool {
        self == Cell::Filled
    }
}

type Row = [Cell; GRID_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; GRID_WIDTH];

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: [Row; GRID_HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; GRID_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        GRID_WIDTH
    }

    pub fn height(&self) -> usize {
        GRID_HEIGHT
    }

    #[inline]
    pub fn in_bounds(row: i16, col: i16) -> bool {
        (0..GRID_HEIGHT as i16).contains(&row) && (0..GRID_WIDTH as i16).contains(&col)
    }

    fn check(row: i16, col: i16) -> Result<(usize, usize), GridError> {
        if Self::in_bounds(row, col) {
            Ok((row as usize, col as usize))
        } else {
            Err(GridError::OutOfBounds { row, col })
        }
    }

    pub fn get(&self, row: i16, col: i16) -> Result<Cell, GridError> {
        let (r, c) = Self::check(row, col)?;
        Ok(self.rows[r][c])
    }

    pub fn is_occupied(&self, row: i16, col: i16) -> Result<bool, GridError> {
        self.get(row, col).map(Cell::is_filled)
    }

    pub fn set(&mut self, row: i16, col: i16, cell: Cell) -> Result<(), GridError> {
        let (r, c) = Self::check(row, col)?;
        self.rows[r][c] = cell;
        Ok(())
    }

    pub fn rows(&self) -> &[Row; GRID_HEIGHT] {
        &self.rows
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|cells| cells.iter().all(|cell| cell.is_filled()))
    }

    pub fn filled_count_in_row(&self, row: usize) -> usize {
        self.rows
            .get(row)
            .map_or(0, |cells| cells.iter().filter(|cell| cell.is_filled()).count())
    }

    pub fn total_filled(&self) -> usize {
        self.occupied().count()
    }

    /// `(row, col)` of every filled cell, top to bottom.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_filled())
                .map(move |(c, _)| (r, c))
        })
    }

    /// Removes every row that is full right now and drops the rest down, returning how many went.
    ///
    /// Fullness is decided for all rows before anything moves, so four rows completed by a single
    /// lock count as one clear of four.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut full = [false; GRID_HEIGHT];
        for (row, flag) in full.iter_mut().enumerate() {
            *flag = self.is_row_full(row);
        }

        let mut write = GRID_HEIGHT;
        for read in (0..GRID_HEIGHT).rev() {
            if full[read] {
                continue;
            }
            write -= 1;
            if write != read {
                self.rows[write] = self.rows[read];
            }
        }

        let cleared = write;
        for row in &mut self.rows[..cleared] {
            *row = EMPTY_ROW;
        }
        cleared
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn fill_row(grid: &mut Grid, row: usize) {
        grid.rows[row] = [Cell::Filled; GRID_WIDTH];
    }

    pub fn fill_row_with_gap(grid: &mut Grid, row: usize, gap_col: usize) {
        fill_row(grid, row);
        grid.rows[row][gap_col] = Cell::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;

    #[test]
    fn compaction_keeps_partial_rows_in_order() {
        let mut grid = Grid::new();
        fill_row(&mut grid, 19);
        grid.set(18, 0, Cell::Filled).unwrap();
        fill_row(&mut grid, 17);
        grid.set(16, 9, Cell::Filled).unwrap();

        assert_eq!(grid.clear_full_rows(), 2);

        assert_eq!(grid.get(19, 0), Ok(Cell::Filled));
        assert_eq!(grid.get(18, 9), Ok(Cell::Filled));
        assert_eq!(grid.total_filled(), 2);
    }

    #[test]
    fn edge_cells_are_in_bounds() {
        assert!(Grid::in_bounds(0, 0));
        assert!(Grid::in_bounds(19, 9));
        assert!(!Grid::in_bounds(-1, 0));
        assert!(!Grid::in_bounds(0, 10));
        assert!(!Grid::in_bounds(20, 0));
    }
}
