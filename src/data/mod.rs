use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    model::Pos,
};

/// Serialized as `"none"`, `"bomb"` or a bare number from 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "ValueRepr", try_from = "ValueRepr")]
pub enum CellValue {
    /// No adjacent mines.
    #[default]
    Empty,
    /// Between 1 and 8 adjacent mines.
    Count(u8),
    Bomb,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Count(u8),
    Named(NamedValue),
}

#[derive(Serialize, Deserialize)]
enum NamedValue {
    #[serde(rename = "none")]
    Empty,
    #[serde(rename = "bomb")]
    Bomb,
}

impl From<CellValue> for ValueRepr {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Empty => Self::Named(NamedValue::Empty),
            CellValue::Count(count) => Self::Count(count),
            CellValue::Bomb => Self::Named(NamedValue::Bomb),
        }
    }
}

impl TryFrom<ValueRepr> for CellValue {
    type Error = String;

    fn try_from(repr: ValueRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            ValueRepr::Count(count @ 1..=8) => Ok(Self::Count(count)),
            ValueRepr::Count(count) => Err(format!("adjacent count {} is not in 1..=8", count)),
            ValueRepr::Named(NamedValue::Empty) => Ok(Self::Empty),
            ValueRepr::Named(NamedValue::Bomb) => Ok(Self::Bomb),
        }
    }
}

impl CellValue {
    pub const fn is_bomb(self) -> bool {
        matches!(self, Self::Bomb)
    }

    fn from_count(count: u8) -> Self {
        if count == 0 { Self::Empty } else { Self::Count(count) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Not revealed yet.
    #[default]
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "visible")]
    Visible,
    #[serde(rename = "flagged")]
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub state: CellState,
    /// Set only on the mine whose reveal lost the game.
    pub clicked: bool,
}

impl Cell {
    pub const fn is_bomb(&self) -> bool {
        self.value.is_bomb()
    }
}

/// Fixed-size, row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn blank(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    /// Builds a grid with mines at exactly the given positions.
    pub fn from_mines(rows: usize, cols: usize, mines: &[Pos]) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::InvalidConfiguration {
                rows,
                cols,
                mines: mines.len(),
            });
        }
        let mut grid = Self::blank(rows, cols);
        for &pos in mines {
            grid.check_bounds(pos)?;
            grid[pos].value = CellValue::Bomb;
        }
        grid.fill_counts();
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn check_bounds(&self, pos: Pos) -> Result<Pos> {
        if pos.row < self.rows && pos.col < self.cols {
            Ok(pos)
        } else {
            Err(EngineError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            })
        }
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.check_bounds(pos).ok().map(|pos| &self[pos])
    }

    pub fn cell(&self, pos: Pos) -> Result<Cell> {
        self.check_bounds(pos).map(|pos| self[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Cell)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (Pos::new(index / cols, index % cols), cell))
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// In-bounds neighbors of `pos`, up to eight.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + use<> {
        let (rows, cols) = (self.rows, self.cols);
        (-1isize..=1)
            .flat_map(|dr| (-1isize..=1).map(move |dc| (dr, dc)))
            .filter(|&delta| delta != (0, 0))
            .filter_map(move |(dr, dc)| {
                let row = pos.row.checked_add_signed(dr)?;
                let col = pos.col.checked_add_signed(dc)?;
                (row < rows && col < cols).then_some(Pos::new(row, col))
            })
    }

    pub fn mine_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_bomb()).count()
    }

    pub fn adjacent_mines(&self, pos: Pos) -> u8 {
        self.neighbors(pos).filter(|&n| self[n].is_bomb()).count() as u8
    }

    /// True once every non-mine cell is visible.
    pub fn all_safe_visible(&self) -> bool {
        self.cells
            .iter()
            .filter(|cell| !cell.is_bomb())
            .all(|cell| cell.state == CellState::Visible)
    }

    /// Recomputes the adjacency value of every non-mine cell.
    pub(crate) fn fill_counts(&mut self) {
        for index in 0..self.cells.len() {
            let pos = Pos::new(index / self.cols, index % self.cols);
            if !self.cells[index].is_bomb() {
                self.cells[index].value = CellValue::from_count(self.adjacent_mines(pos));
            }
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.cols).map(|row| row.to_vec()).collect()
    }
}

impl Index<Pos> for Grid {
    type Output = Cell;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.cells[pos.row * self.cols + pos.col]
    }
}

impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        &mut self.cells[pos.row * self.cols + pos.col]
    }
}
