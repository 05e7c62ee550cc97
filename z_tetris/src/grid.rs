use serde::{Deserialize, Serialize};

use crate::piece::{Color, Piece};

pub const ROWS: usize = 20;
pub const COLS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Settled blocks, `rows` x `cols`, row 0 at the top
///
/// Dimensions never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Cell>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(ROWS, COLS)
    }
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![Cell::Empty; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at column `x`, row `y`; `None` outside the grid
    pub fn get(&self, x: isize, y: isize) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells.get(y as usize)?.get(x as usize).copied()
    }

    /// Set a cell; out of range coordinates are ignored
    pub fn set(&mut self, x: isize, y: isize, cell: Cell) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(slot) = self
            .cells
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *slot = cell;
        }
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y]
    }

    /// Fill row `y` with `color`, leaving the listed columns empty
    pub fn fill_row_except(&mut self, y: usize, color: Color, holes: &[usize]) {
        for (x, cell) in self.cells[y].iter_mut().enumerate() {
            *cell = if holes.contains(&x) {
                Cell::Empty
            } else {
                Cell::Filled(color)
            };
        }
    }

    /// Count of non-empty cells
    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| !c.is_empty())
            .count()
    }

    /// Bake a landed piece into the grid
    ///
    /// Cells above the top row are dropped. Cells outside the grid
    /// horizontally or below the floor are ignored as well.
    pub fn merge(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if y >= 0 {
                self.set(x, y, Cell::Filled(piece.color));
            }
        }
    }

    /// Remove full rows, inserting empty ones at the top, and return how many
    /// were removed
    pub fn clear_full_rows(&mut self) -> usize {
        let cols = self.cols;
        let before = self.cells.len();
        self.cells.retain(|row| row.iter().any(|c| c.is_empty()));
        let cleared = before - self.cells.len();
        for _ in 0..cleared {
            self.cells.insert(0, vec![Cell::Empty; cols]);
        }
        cleared
    }
}
