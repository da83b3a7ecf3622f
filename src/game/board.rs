//! Fixed-size grid of cells.
//!
//! Coordinates are `(row, col)` with row 0 at the top. The board never
//! changes shape: clearing rows removes them and pushes the same number of
//! empty rows in at the top.

use super::pieces::Color;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Locked(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    cols: usize,
    grid: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates an all-empty board.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            grid: vec![vec![Cell::Empty; cols]; rows],
        }
    }

    /// Wraps an existing grid.
    ///
    /// # Panics
    ///
    /// Panics if the grid is empty or its rows differ in width.
    pub fn from_cells(grid: Vec<Vec<Cell>>) -> Self {
        assert!(!grid.is_empty(), "board needs at least one row");
        let cols = grid[0].len();
        assert!(
            grid.iter().all(|row| row.len() == cols),
            "board rows must all have the same width"
        );
        Self { cols, grid }
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.grid.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.iter().map(Vec::as_slice)
    }

    /// True iff `(row, col)` is on the board and holds no locked cell.
    pub fn is_empty_at(&self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        self.cell(row as usize, col as usize)
            .is_some_and(|cell| cell.is_empty())
    }

    /// Overwrites a single cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(slot) = self.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    /// Writes `color` into every listed cell. Callers only pass positions
    /// that already passed the legality check.
    pub fn lock<I>(&mut self, cells: I, color: Color)
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        for (row, col) in cells {
            self.set(row, col, Cell::Locked(color));
        }
    }

    /// False for rows past the bottom.
    pub fn is_row_full(&self, row: usize) -> bool {
        self.grid.get(row).is_some_and(|cells| is_full(cells))
    }

    pub fn filled_count_in_row(&self, row: usize) -> usize {
        self.grid[row].iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.grid.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }

    /// Removes every full row in one pass and refills the top with empty rows.
    ///
    /// Surviving rows keep their relative order. Returns how many rows went.
    pub fn clear_full_rows(&mut self) -> usize {
        let rows = self.grid.len();
        self.grid.retain(|cells| !is_full(cells));

        let cleared = rows - self.grid.len();
        if cleared > 0 {
            let cols = self.cols;
            let fresh = std::iter::repeat_with(|| vec![Cell::Empty; cols]).take(cleared);
            self.grid.splice(0..0, fresh);
        }

        cleared
    }
}

fn is_full(cells: &[Cell]) -> bool {
    cells.iter().all(|cell| !cell.is_empty())
}
